/// Location-grounded artist search
///
/// Issues a maps-grounded query styled after the chosen tattoo style and
/// maps the grounding chunks into ArtistRecords. When the primary query
/// comes back empty, one broader fallback query runs before giving up
/// with an empty list.

use serde_json::json;

use super::client::{GeminiGateway, GroundingChunk, TEXT_MODEL};
use super::error::GatewayError;
use crate::state::artist::{extract_coordinate, ArtistRecord, Coordinate};

const FALLBACK_QUERY: &str = "Show me tattoo shops near this location";

pub async fn find_artists(
    gateway: &GeminiGateway,
    style: &str,
    location: Coordinate,
) -> Result<Vec<ArtistRecord>, GatewayError> {
    let prompt = format!(
        "Find tattoo shops and tattoo parlors near me that specialize in {style} style tattoos. \
         Show me the best rated tattoo studios and artists in this area."
    );

    let chunks = grounded_chunks(gateway, &prompt, location).await?;
    if chunks.is_empty() {
        log::warn!("No grounding chunks for '{style}'; retrying with a broader query");
        let fallback_chunks = grounded_chunks(gateway, FALLBACK_QUERY, location).await?;
        return Ok(artists_from_chunks(&fallback_chunks));
    }

    Ok(artists_from_chunks(&chunks))
}

async fn grounded_chunks(
    gateway: &GeminiGateway,
    prompt: &str,
    location: Coordinate,
) -> Result<Vec<GroundingChunk>, GatewayError> {
    let payload = json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "tools": [{ "googleMaps": {} }],
        "toolConfig": {
            "retrievalConfig": {
                "latLng": {
                    "latitude": location.latitude,
                    "longitude": location.longitude,
                },
            },
        },
    });

    let response = gateway.generate_content(TEXT_MODEL, &payload).await?;
    Ok(response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.grounding_metadata)
        .map(|metadata| metadata.grounding_chunks)
        .unwrap_or_default())
}

/// Chunks need both a link and a display name to become records; rating
/// and review count come from the first answer source when present.
pub(crate) fn artists_from_chunks(chunks: &[GroundingChunk]) -> Vec<ArtistRecord> {
    chunks
        .iter()
        .filter_map(|chunk| {
            let place = chunk.maps.as_ref()?;
            let (Some(title), Some(uri)) = (place.title.as_ref(), place.uri.as_ref()) else {
                return None;
            };
            let source = place
                .place_answer_sources
                .as_ref()
                .and_then(|sources| sources.first());

            Some(ArtistRecord {
                title: title.clone(),
                uri: uri.clone(),
                place_id: place.place_id.clone(),
                rating: source.and_then(|s| s.rating),
                review_count: source.and_then(|s| s.review_count),
                coordinate: extract_coordinate(uri),
            })
        })
        .collect()
}
