use std::io::Cursor;

use exif::{Exif, In, Tag, Value};

/// One component of a degrees/minutes/seconds triple. EXIF stores these as
/// rationals, but some writers emit plain numerics, so both forms are kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Angle {
    Rational { num: f64, den: f64 },
    Scalar(f64),
}

impl Angle {
    pub fn to_f64(self) -> f64 {
        match self {
            // A zero denominator makes the division meaningless; fall back
            // to reading the numerator as an already-numeric value.
            Angle::Rational { num, den } if den == 0.0 => num,
            Angle::Rational { num, den } => num / den,
            Angle::Scalar(v) => v,
        }
    }
}

/// A degrees/minutes/seconds angular value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub degrees: Angle,
    pub minutes: Angle,
    pub seconds: Angle,
}

impl Dms {
    pub fn decimal_degrees(&self) -> f64 {
        self.degrees.to_f64() + self.minutes.to_f64() / 60.0 + self.seconds.to_f64() / 3600.0
    }

    fn from_value(value: &Value) -> Option<Dms> {
        let component = |i: usize| -> Option<Angle> {
            match value {
                Value::Rational(v) => {
                    let r = v.get(i)?;
                    Some(Angle::Rational {
                        num: r.num as f64,
                        den: r.denom as f64,
                    })
                }
                Value::SRational(v) => {
                    let r = v.get(i)?;
                    Some(Angle::Rational {
                        num: r.num as f64,
                        den: r.denom as f64,
                    })
                }
                Value::Float(v) => Some(Angle::Scalar(*v.get(i)? as f64)),
                Value::Double(v) => Some(Angle::Scalar(*v.get(i)?)),
                Value::Short(v) => Some(Angle::Scalar(*v.get(i)? as f64)),
                Value::Long(v) => Some(Angle::Scalar(*v.get(i)? as f64)),
                _ => None,
            }
        };
        Some(Dms {
            degrees: component(0)?,
            minutes: component(1)?,
            seconds: component(2)?,
        })
    }
}

/// Hemisphere reference attached to a DMS value. South and West carry a
/// negative sign in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hemisphere {
    North,
    South,
    East,
    West,
}

impl Hemisphere {
    pub fn sign(self) -> f64 {
        match self {
            Hemisphere::South | Hemisphere::West => -1.0,
            Hemisphere::North | Hemisphere::East => 1.0,
        }
    }

    pub fn from_ascii(byte: u8) -> Option<Hemisphere> {
        match byte {
            b'N' => Some(Hemisphere::North),
            b'S' => Some(Hemisphere::South),
            b'E' => Some(Hemisphere::East),
            b'W' => Some(Hemisphere::West),
            _ => None,
        }
    }

    // Writers emit the reference either as ASCII text or as a raw byte;
    // both spellings mean the same thing. A character outside N/S/E/W is a
    // malformed field: it voids the geotag and routes the report to the
    // client fallback, instead of being silently read as a positive sign.
    fn from_value(value: &Value) -> Option<Hemisphere> {
        match value {
            Value::Ascii(v) => Hemisphere::from_ascii(*v.first()?.first()?),
            Value::Byte(v) => Hemisphere::from_ascii(*v.first()?),
            _ => None,
        }
    }
}

/// The geotag block of an image: latitude and longitude as DMS triples plus
/// their hemisphere references.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTag {
    pub latitude: Dms,
    pub latitude_ref: Hemisphere,
    pub longitude: Dms,
    pub longitude_ref: Hemisphere,
}

impl GeoTag {
    /// Decodes the geotag from raw image bytes. Absent GPS fields and
    /// malformed metadata both come back as `None`; metadata problems must
    /// never abort a report submission.
    pub fn from_bytes(bytes: &[u8]) -> Option<GeoTag> {
        let mut reader = Cursor::new(bytes);
        let exif = match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(err) => {
                log::debug!("unreadable image metadata, treating as no geotag: {err}");
                return None;
            }
        };
        GeoTag::from_exif(&exif)
    }

    /// All four GPS fields are required; a missing or empty one yields
    /// `None` rather than an error.
    pub fn from_exif(exif: &Exif) -> Option<GeoTag> {
        let value = |tag: Tag| Some(&exif.get_field(tag, In::PRIMARY)?.value);
        Some(GeoTag {
            latitude: Dms::from_value(value(Tag::GPSLatitude)?)?,
            latitude_ref: Hemisphere::from_value(value(Tag::GPSLatitudeRef)?)?,
            longitude: Dms::from_value(value(Tag::GPSLongitude)?)?,
            longitude_ref: Hemisphere::from_value(value(Tag::GPSLongitudeRef)?)?,
        })
    }

    /// `(lat, lng)` in signed decimal degrees.
    pub fn decimal_degrees(&self) -> (f64, f64) {
        (
            self.latitude_ref.sign() * self.latitude.decimal_degrees(),
            self.longitude_ref.sign() * self.longitude.decimal_degrees(),
        )
    }
}

/// Builds a minimal little-endian TIFF blob whose GPS IFD holds the given
/// rational DMS triples and reference characters.
#[cfg(test)]
pub(crate) fn gps_tiff(
    lat: [(u32, u32); 3],
    lat_ref: u8,
    lng: [(u32, u32); 3],
    lng_ref: u8,
) -> Vec<u8> {
    let mut out = Vec::new();
    // Header: byte order, magic, offset of IFD0.
    out.extend_from_slice(b"II");
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());

    // IFD0 at offset 8: a single GPS sub-IFD pointer.
    let gps_ifd_offset = 8 + 2 + 12 + 4;
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&0x8825u16.to_le_bytes()); // GPSInfo
    out.extend_from_slice(&4u16.to_le_bytes()); // LONG
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&(gps_ifd_offset as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    // GPS IFD: refs inline, rational triples in the data area behind it.
    let data_offset = gps_ifd_offset + 2 + 4 * 12 + 4;
    out.extend_from_slice(&4u16.to_le_bytes());
    let mut entry = |tag: u16, kind: u16, count: u32, value: [u8; 4]| {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&kind.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&value);
    };
    entry(1, 2, 2, [lat_ref, 0, 0, 0]); // GPSLatitudeRef, ASCII
    entry(2, 5, 3, (data_offset as u32).to_le_bytes()); // GPSLatitude, RATIONAL
    entry(3, 2, 2, [lng_ref, 0, 0, 0]); // GPSLongitudeRef
    entry(4, 5, 3, ((data_offset + 24) as u32).to_le_bytes()); // GPSLongitude
    out.extend_from_slice(&0u32.to_le_bytes());

    for (num, den) in lat.iter().chain(lng.iter()) {
        out.extend_from_slice(&num.to_le_bytes());
        out.extend_from_slice(&den.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rational(num: u32, den: u32) -> Angle {
        Angle::Rational {
            num: num as f64,
            den: den as f64,
        }
    }

    #[test]
    fn rational_angle_divides() {
        assert_eq!(rational(5400, 100).to_f64(), 54.0);
    }

    #[test]
    fn zero_denominator_falls_back_to_numerator() {
        assert_eq!(rational(37, 0).to_f64(), 37.0);
    }

    #[test]
    fn dms_decimal_degrees_exact() {
        let dms = Dms {
            degrees: rational(37, 1),
            minutes: rational(30, 1),
            seconds: rational(36, 1),
        };
        assert_eq!(dms.decimal_degrees(), 37.0 + 30.0 / 60.0 + 36.0 / 3600.0);
    }

    #[test]
    fn mixed_rational_and_scalar_components() {
        let dms = Dms {
            degrees: Angle::Scalar(122.0),
            minutes: rational(15, 1),
            seconds: rational(900, 100),
        };
        assert_eq!(dms.decimal_degrees(), 122.0 + 15.0 / 60.0 + 9.0 / 3600.0);
    }

    #[test]
    fn hemisphere_signs() {
        assert_eq!(Hemisphere::North.sign(), 1.0);
        assert_eq!(Hemisphere::East.sign(), 1.0);
        assert_eq!(Hemisphere::South.sign(), -1.0);
        assert_eq!(Hemisphere::West.sign(), -1.0);
    }

    #[test]
    fn text_and_byte_references_are_equivalent() {
        let text = Hemisphere::from_value(&Value::Ascii(vec![b"S".to_vec()]));
        let byte = Hemisphere::from_value(&Value::Byte(vec![b'S']));
        assert_eq!(text, Some(Hemisphere::South));
        assert_eq!(text, byte);
    }

    #[test]
    fn unrecognized_reference_is_absent() {
        assert_eq!(Hemisphere::from_value(&Value::Ascii(vec![b"Q".to_vec()])), None);
        assert_eq!(Hemisphere::from_value(&Value::Byte(vec![b'x'])), None);
    }

    #[test]
    fn unrecognized_reference_voids_the_geotag() {
        let blob = gps_tiff(
            [(37, 1), (0, 1), (0, 1)],
            b'Q',
            [(122, 1), (0, 1), (0, 1)],
            b'W',
        );
        assert!(GeoTag::from_bytes(&blob).is_none());
    }

    #[test]
    fn empty_reference_is_absent() {
        assert_eq!(Hemisphere::from_value(&Value::Ascii(vec![])), None);
        assert_eq!(Hemisphere::from_value(&Value::Ascii(vec![vec![]])), None);
    }

    #[test]
    fn decodes_geotag_from_tiff() {
        let blob = gps_tiff(
            [(37, 1), (0, 1), (0, 1)],
            b'N',
            [(122, 1), (0, 1), (0, 1)],
            b'W',
        );
        let tag = GeoTag::from_bytes(&blob).unwrap();
        let (lat, lng) = tag.decimal_degrees();
        assert_eq!(lat, 37.0);
        assert_eq!(lng, -122.0);
    }

    #[test]
    fn southern_hemisphere_negates_latitude() {
        let blob = gps_tiff(
            [(33, 1), (52, 1), (12, 1)],
            b'S',
            [(151, 1), (12, 1), (36, 1)],
            b'E',
        );
        let (lat, lng) = GeoTag::from_bytes(&blob).unwrap().decimal_degrees();
        assert_eq!(lat, -(33.0 + 52.0 / 60.0 + 12.0 / 3600.0));
        assert_eq!(lng, 151.0 + 12.0 / 60.0 + 36.0 / 3600.0);
    }

    #[test]
    fn garbage_bytes_yield_no_geotag() {
        assert!(GeoTag::from_bytes(b"definitely not an image").is_none());
        assert!(GeoTag::from_bytes(&[]).is_none());
    }

    #[test]
    fn truncated_tiff_yields_no_geotag() {
        let blob = gps_tiff(
            [(37, 1), (0, 1), (0, 1)],
            b'N',
            [(122, 1), (0, 1), (0, 1)],
            b'W',
        );
        assert!(GeoTag::from_bytes(&blob[..20]).is_none());
    }
}
