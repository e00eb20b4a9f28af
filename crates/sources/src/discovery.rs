//! Resource discovery through `/.well-known/core`

use sensplot_core::{SensorClient, SensorRequest, TransportError, WELL_KNOWN_CORE};

/// List the resources `endpoint` advertises
pub async fn discover<C: SensorClient + ?Sized>(
    client: &C,
    endpoint: &str,
) -> Result<Vec<String>, TransportError> {
    let uri = format!("{}/{}", endpoint.trim_end_matches('/'), WELL_KNOWN_CORE);
    let response = client.send(&SensorRequest::retrieve(uri.clone())).await?;
    let text = String::from_utf8(response.payload).map_err(|e| TransportError::Malformed {
        uri,
        reason: e.to_string(),
    })?;
    Ok(parse_link_format(&text))
}

/// Extract the target paths from a CoRE link-format document
///
/// `</temperature>;ct=0,</humidity>;ct=0` yields `["/temperature", "/humidity"]`.
/// Commas inside quoted attribute values do not split links.
pub fn parse_link_format(text: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                links.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    links.push(&text[start..]);

    links
        .into_iter()
        .filter_map(|link| {
            let link = link.trim();
            let target = link.strip_prefix('<')?;
            let end = target.find('>')?;
            let target = &target[..end];
            (!target.is_empty()).then(|| target.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mote_listing() {
        let listing = "</.well-known/core>,</airquality>;ct=0,</humidity>;ct=0,</led>;ct=0,</temperature>;ct=0";
        assert_eq!(
            parse_link_format(listing),
            vec![
                "/.well-known/core",
                "/airquality",
                "/humidity",
                "/led",
                "/temperature",
            ]
        );
    }

    #[test]
    fn test_parse_quoted_commas() {
        let listing = r#"</sensors/temp>;rt="temperature-c,celsius";if="sensor", </sensors/light>"#;
        assert_eq!(
            parse_link_format(listing),
            vec!["/sensors/temp", "/sensors/light"]
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_link_format("").is_empty());
        assert!(parse_link_format("no links here, <>").is_empty());
    }
}
