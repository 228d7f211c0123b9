use std::str::FromStr;

use scraper::ElementRef;

use crate::extract_error::DecodeError;

/// One glyph of a price. Station pages render prices as a row of
/// elements whose class names (`p0`..`p9`, `pd`) pick a sprite, so the
/// digits only exist as markers, never as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitMarker {
    Digit(u8),
    Point,
}

impl DigitMarker {
    pub fn as_char(self) -> char {
        match self {
            DigitMarker::Digit(d) => char::from(b'0' + d),
            DigitMarker::Point => '.',
        }
    }
}

impl FromStr for DigitMarker {
    type Err = ();

    fn from_str(marker: &str) -> Result<Self, Self::Err> {
        match marker.as_bytes() {
            [b'p', b'd'] => Ok(DigitMarker::Point),
            [b'p', d @ b'0'..=b'9'] => Ok(DigitMarker::Digit(d - b'0')),
            _ => Err(()),
        }
    }
}

/// Maps each marker to its character, in order. The result is not checked
/// to be a well-formed number.
pub fn decode_markers<'a, I>(markers: I) -> Result<String, DecodeError>
where
    I: IntoIterator<Item = &'a str>,
{
    markers
        .into_iter()
        .enumerate()
        .map(|(position, marker)| {
            marker
                .parse::<DigitMarker>()
                .map(DigitMarker::as_char)
                .map_err(|_| DecodeError::UnknownMarker {
                    position,
                    marker: marker.to_string(),
                })
        })
        .collect()
}

/// Decodes the child elements of a `.sp_p` price container.
pub fn decode_price_element(price: ElementRef) -> Result<String, DecodeError> {
    let markers: Vec<&str> = price
        .child_elements()
        .map(|child| {
            let element = child.value();
            element
                .classes()
                .find(|class| class.parse::<DigitMarker>().is_ok())
                .unwrap_or_else(|| element.attr("class").unwrap_or(""))
        })
        .collect();
    decode_markers(markers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    #[test]
    fn test_marker_from_str() {
        assert_eq!("p0".parse::<DigitMarker>(), Ok(DigitMarker::Digit(0)));
        assert_eq!("p9".parse::<DigitMarker>(), Ok(DigitMarker::Digit(9)));
        assert_eq!("pd".parse::<DigitMarker>(), Ok(DigitMarker::Point));
        assert!("p".parse::<DigitMarker>().is_err());
        assert!("p10".parse::<DigitMarker>().is_err());
        assert!("P1".parse::<DigitMarker>().is_err());
        assert!("".parse::<DigitMarker>().is_err());
    }

    #[test]
    fn test_decode_keeps_order_and_length() {
        let markers = ["p3", "pd", "p8", "p9", "p9"];
        let price = decode_markers(markers).unwrap();
        assert_eq!(price, "3.899");
        assert_eq!(price.chars().count(), markers.len());
    }

    #[test]
    fn test_every_vocabulary_marker() {
        let markers = ["p0", "p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8", "p9", "pd"];
        assert_eq!(decode_markers(markers).unwrap(), "0123456789.");
    }

    #[test]
    fn test_decode_passes_odd_shapes_through() {
        assert_eq!(decode_markers(["pd", "pd", "p1"]).unwrap(), "..1");
        assert_eq!(decode_markers(Vec::<&str>::new()).unwrap(), "");
    }

    #[test]
    fn test_decode_is_deterministic() {
        let markers = ["p4", "pd", "p0", "p5"];
        assert_eq!(decode_markers(markers).unwrap(), decode_markers(markers).unwrap());
    }

    #[test]
    fn test_unknown_marker_fails() {
        let err = decode_markers(["p3", "pd", "px", "p9"]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownMarker {
                position: 2,
                marker: "px".to_string()
            }
        );
    }

    #[test]
    fn test_decode_price_element() {
        let html = Html::parse_fragment(
            r#"<div class="sp_p"><div class="p4"></div><div class="pd"></div><div class="sprite p1"></div><div class="p9"></div></div>"#,
        );
        let selector = Selector::parse(".sp_p").unwrap();
        let price = html.select(&selector).next().unwrap();
        assert_eq!(decode_price_element(price).unwrap(), "4.19");
    }

    #[test]
    fn test_decode_price_element_without_class() {
        let html = Html::parse_fragment(r#"<div class="sp_p"><div class="p4"></div><span></span></div>"#);
        let selector = Selector::parse(".sp_p").unwrap();
        let price = html.select(&selector).next().unwrap();
        let err = decode_price_element(price).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownMarker {
                position: 1,
                marker: String::new()
            }
        );
    }
}
