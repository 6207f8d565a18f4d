//! GeoTIFF tag numbers and GeoKey directory encoding.
//!
//! Only the subset needed to carry an extent and an EPSG projection is
//! handled: ModelPixelScale, ModelTiepoint, ModelTransformation,
//! GeoKeyDirectory, GeoAsciiParams and GDAL_NODATA.

use tiff::tags::Tag;

pub(crate) const MODEL_PIXEL_SCALE: u16 = 33550;
pub(crate) const MODEL_TIEPOINT: u16 = 33922;
pub(crate) const MODEL_TRANSFORMATION: u16 = 34264;
pub(crate) const GEO_KEY_DIRECTORY: u16 = 34735;
pub(crate) const GEO_ASCII_PARAMS: u16 = 34737;
pub(crate) const GDAL_NODATA: u16 = 42113;

const GT_MODEL_TYPE: u16 = 1024;
const GT_RASTER_TYPE: u16 = 1025;
const GT_CITATION: u16 = 1026;
const GEOGRAPHIC_TYPE: u16 = 2048;
const PROJECTED_CS_TYPE: u16 = 3072;

const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;

/// Tag for a GeoTIFF tag number.
///
/// Named variants are used when the tiff crate knows the number so that
/// lookups match the tags the decoder parsed.
pub(crate) fn tag(code: u16) -> Tag {
    Tag::from_u16_exhaustive(code)
}

/// Parse an EPSG code out of a projection name.
///
/// Accepts `EPSG:4326`, `epsg:4326`, `urn:ogc:def:crs:EPSG::3857` and WKT
/// containing `AUTHORITY["EPSG","32631"]` (the last authority wins, which is
/// the one of the outermost CRS).
pub fn epsg_code(projection: &str) -> Option<u32> {
    const AUTHORITY: &str = "AUTHORITY[\"EPSG\",\"";
    if let Some(pos) = projection.rfind(AUTHORITY) {
        return leading_digits(&projection[pos + AUTHORITY.len()..]);
    }

    let upper = projection.to_ascii_uppercase();
    if !upper.contains("EPSG") {
        return None;
    }
    projection
        .rsplit(':')
        .next()
        .and_then(|code| code.trim().parse().ok())
}

fn leading_digits(text: &str) -> Option<u32> {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

/// EPSG codes in this range are geographic (lat/lon) reference systems.
fn is_geographic(code: u32) -> bool {
    (4000..5000).contains(&code)
}

/// GeoKey directory and GeoAsciiParams for a projection name.
pub(crate) fn encode(projection: &str) -> (Vec<u16>, String) {
    let citation = format!("{}|", projection);
    let mut entries: Vec<[u16; 4]> = Vec::new();

    let code = epsg_code(projection).and_then(|c| u16::try_from(c).ok().map(|v| (c, v)));
    if let Some((code, _)) = code {
        let model = if is_geographic(code) {
            MODEL_TYPE_GEOGRAPHIC
        } else {
            MODEL_TYPE_PROJECTED
        };
        entries.push([GT_MODEL_TYPE, 0, 1, model]);
    }
    entries.push([GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA]);
    entries.push([GT_CITATION, GEO_ASCII_PARAMS, citation.len() as u16, 0]);
    if let Some((code, value)) = code {
        let key = if is_geographic(code) {
            GEOGRAPHIC_TYPE
        } else {
            PROJECTED_CS_TYPE
        };
        entries.push([key, 0, 1, value]);
    }

    let mut directory = vec![1, 1, 0, entries.len() as u16];
    directory.extend(entries.into_iter().flatten());
    (directory, citation)
}

/// Projection name from a GeoKey directory and optional GeoAsciiParams.
///
/// An EPSG coordinate system key wins; otherwise the citation text is used.
pub(crate) fn decode(directory: &[u16], ascii_params: Option<&str>) -> Option<String> {
    if directory.len() < 4 {
        return None;
    }
    let count = directory[3] as usize;
    let entries = directory[4..].chunks_exact(4).take(count);

    let mut citation = None;
    for entry in entries {
        let (key, location, len, value) = (entry[0], entry[1], entry[2], entry[3]);
        match key {
            // 0 is undefined and 32767 user-defined
            PROJECTED_CS_TYPE | GEOGRAPHIC_TYPE
                if location == 0 && value != 0 && value != 32767 =>
            {
                return Some(format!("EPSG:{}", value));
            }
            GT_CITATION if location == GEO_ASCII_PARAMS => {
                citation = ascii_params.and_then(|params| {
                    let start = value as usize;
                    let end = (start + len as usize).min(params.len());
                    params
                        .get(start..end)
                        .map(|s| s.trim_end_matches(['|', '\0']).to_string())
                        .filter(|s| !s.is_empty())
                });
            }
            _ => {}
        }
    }
    citation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsg_code_forms() {
        assert_eq!(epsg_code("EPSG:3857"), Some(3857));
        assert_eq!(epsg_code("epsg:4326"), Some(4326));
        assert_eq!(epsg_code("urn:ogc:def:crs:EPSG::2154"), Some(2154));
        assert_eq!(
            epsg_code(
                "PROJCS[\"WGS 84 / UTM zone 31N\",GEOGCS[\"WGS 84\",AUTHORITY[\"EPSG\",\"4326\"]],AUTHORITY[\"EPSG\",\"32631\"]]"
            ),
            Some(32631)
        );
        assert_eq!(epsg_code("urn:ogc:def:crs:OGC:1.3:CRS84"), None);
        assert_eq!(epsg_code("local grid"), None);
    }

    #[test]
    fn test_encode_projected() {
        let (directory, citation) = encode("EPSG:3857");
        assert_eq!(citation, "EPSG:3857|");
        assert_eq!(&directory[..4], &[1, 1, 0, 4]);
        assert_eq!(&directory[4..8], &[GT_MODEL_TYPE, 0, 1, MODEL_TYPE_PROJECTED]);
        assert_eq!(&directory[16..20], &[PROJECTED_CS_TYPE, 0, 1, 3857]);
    }

    #[test]
    fn test_encode_geographic() {
        let (directory, _) = encode("EPSG:4326");
        assert_eq!(&directory[4..8], &[GT_MODEL_TYPE, 0, 1, MODEL_TYPE_GEOGRAPHIC]);
        assert_eq!(&directory[16..20], &[GEOGRAPHIC_TYPE, 0, 1, 4326]);
    }

    #[test]
    fn test_decode_roundtrip_epsg_and_citation() {
        let (directory, citation) = encode("EPSG:32631");
        assert_eq!(decode(&directory, Some(&citation)).as_deref(), Some("EPSG:32631"));

        let (directory, citation) = encode("Lambert local");
        assert_eq!(directory[3], 2);
        assert_eq!(decode(&directory, Some(&citation)).as_deref(), Some("Lambert local"));
        assert_eq!(decode(&directory, None), None);
    }
}
