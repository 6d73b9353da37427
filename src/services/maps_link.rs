use url::Url;

use crate::error::ItineraryError;
use crate::models::place::Place;

const MAPS_BASE: &str = "https://www.google.com/maps/";

/// Shareable Google Maps link for an ordered list of places.
///
/// One place opens a search for it; two or more open driving directions from
/// the first place to the last with the rest as waypoints, in order.
pub fn maps_link(places: &[Place]) -> Result<String, ItineraryError> {
    let base = Url::parse(MAPS_BASE)
        .map_err(|e| ItineraryError::collaborator("maps link", e.to_string()))?;

    let url = match places {
        [] => return Err(ItineraryError::invalid_input("no places to link")),
        [only] => {
            let mut url = base
                .join("search/")
                .map_err(|e| ItineraryError::collaborator("maps link", e.to_string()))?;
            url.query_pairs_mut()
                .append_pair("api", "1")
                .append_pair("query", &only.location.to_query());
            url
        }
        [origin, middle @ .., destination] => {
            let mut url = base
                .join("dir/")
                .map_err(|e| ItineraryError::collaborator("maps link", e.to_string()))?;
            {
                let mut query = url.query_pairs_mut();
                query
                    .append_pair("api", "1")
                    .append_pair("origin", &origin.location.to_query())
                    .append_pair("destination", &destination.location.to_query());
                if !middle.is_empty() {
                    let waypoints = middle
                        .iter()
                        .map(|p| p.location.to_query())
                        .collect::<Vec<_>>()
                        .join("|");
                    query.append_pair("waypoints", &waypoints);
                }
                query.append_pair("travelmode", "driving");
            }
            url
        }
    };

    Ok(url.to_string())
}
