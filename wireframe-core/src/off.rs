/// Parser for OFF-style text meshes
///
/// The layout is line oriented: a format line, a counts line whose first token is the
/// vertex count, one `x y z` record per vertex, then one `n i0 i1 ...` record per face.
/// Numbers are read leniently from the longest valid prefix of a token and anything
/// unreadable becomes NaN instead of an error.
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1, one_of},
    combinator::{opt, recognize},
    sequence::{pair, tuple},
    IResult,
};
use tracing::debug;

use crate::error::LoadError;
use crate::geometry::{Mesh, Polygon, Vertex};

/// Number of retained lines before the first vertex record
const HEADER_LINES: usize = 2;

/// One retained, normalized line split into tokens
#[derive(Debug, Clone, PartialEq)]
struct Record {
    tokens: Vec<String>,
}

impl Record {
    fn parse(line: &str) -> Self {
        let normalized = normalize_line(line);
        let mut tokens: Vec<String> = normalized.split_whitespace().map(str::to_owned).collect();
        if tokens.is_empty() {
            // A blank line still counts as a record with one empty token
            tokens.push(String::new());
        }
        Self { tokens }
    }

    fn token(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Interpret this record as a vertex; `None` if it has fewer than three tokens
    fn vertex(&self) -> Option<Vertex> {
        match self.tokens.as_slice() {
            [x, y, z, ..] => Some(Vertex::new(parse_float(x), parse_float(y), parse_float(z))),
            _ => None,
        }
    }
}

/// Parse a text mesh into polygons, in face order
pub fn parse_off(input: &str) -> Result<Mesh, LoadError> {
    let records: Vec<Record> = input
        .split('\n')
        .filter(|line| !line.starts_with('#'))
        .map(Record::parse)
        .collect();

    let counts = records
        .get(1)
        .ok_or_else(|| LoadError::parse("missing vertex count line"))?;
    let vertex_count = counts
        .token(0)
        .and_then(parse_int)
        .ok_or_else(|| LoadError::parse("vertex count is not an integer"))?;
    let vertex_count = usize::try_from(vertex_count)
        .map_err(|_| LoadError::parse(format!("negative vertex count {vertex_count}")))?;

    let vertex_end = HEADER_LINES.saturating_add(vertex_count).min(records.len());
    let vertex_block = &records[HEADER_LINES.min(vertex_end)..vertex_end];

    // The final record is the trailing line after the last face and is never a face
    let face_start = HEADER_LINES.saturating_add(vertex_count);
    let face_end = records.len().saturating_sub(1);

    let mut mesh = Mesh::with_capacity(face_end.saturating_sub(face_start));
    for (line, face) in records
        .iter()
        .enumerate()
        .take(face_end)
        .skip(face_start)
    {
        let vertices = face_vertices(face, vertex_block);
        let corners = vertices.len();
        match Polygon::new(vertices) {
            Some(polygon) => mesh.add_polygon(polygon),
            None => debug!(line, corners, "dropping face with fewer than three usable vertices"),
        }
    }

    Ok(mesh)
}

/// Dereference every index listed by a face record, skipping unusable vertices
fn face_vertices(face: &Record, vertex_block: &[Record]) -> Vec<Vertex> {
    let declared = face.token(0).and_then(parse_int).unwrap_or(0);
    // Only indices actually present on the line can be read
    let declared = usize::try_from(declared)
        .unwrap_or(0)
        .min(face.tokens.len().saturating_sub(1));

    let mut vertices = Vec::with_capacity(declared);
    for slot in 1..=declared {
        let record = face
            .token(slot)
            .and_then(parse_int)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| vertex_block.get(index));

        match record.and_then(Record::vertex) {
            Some(vertex) => vertices.push(vertex),
            None => debug!(slot, "skipping unusable face vertex"),
        }
    }
    vertices
}

/// Insert a leading zero into decimals such as `-.5` or ` .5`, drop backslashes
fn normalize_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 4);
    let mut prev: Option<char> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '.'
            && prev.is_some_and(|p| p == '-' || p.is_whitespace())
            && chars.peek().is_some_and(char::is_ascii_digit)
        {
            out.push('0');
        }
        if c != '\\' {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

fn float_prefix(input: &str) -> IResult<&str, &str> {
    let mantissa = alt((
        recognize(pair(digit1, opt(pair(char('.'), digit0)))),
        recognize(pair(char('.'), digit1)),
    ));
    let exponent = recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)));

    recognize(pair(
        opt(one_of("+-")),
        alt((tag("Infinity"), recognize(pair(mantissa, opt(exponent))))),
    ))(input)
}

fn int_prefix(input: &str) -> IResult<&str, &str> {
    recognize(pair(opt(one_of("+-")), digit1))(input)
}

/// Read the longest numeric prefix of a token; NaN if there is none
pub fn parse_float(token: &str) -> f64 {
    float_prefix(token.trim_start())
        .ok()
        .and_then(|(_, number)| number.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Read the longest integer prefix of a token
pub fn parse_int(token: &str) -> Option<i64> {
    int_prefix(token.trim_start())
        .ok()
        .and_then(|(_, number)| number.parse::<i64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const QUAD: &str = "OFF\n4 1 0\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\n";

    #[test]
    fn test_single_quad() {
        let mesh = parse_off(QUAD).unwrap();
        assert_eq!(mesh.len(), 1);

        let vertices = mesh.polygons[0].vertices();
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[0], Vertex::new(0.0, 0.0, 0.0));
        assert_eq!(vertices[1], Vertex::new(1.0, 0.0, 0.0));
        assert_eq!(vertices[2], Vertex::new(1.0, 1.0, 0.0));
        assert_eq!(vertices[3], Vertex::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_face_order_follows_indices() {
        let mesh = parse_off("OFF\n4 1 0\n0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 3 2 1 0\n").unwrap();
        let vertices = mesh.polygons[0].vertices();
        assert_eq!(vertices[0], Vertex::new(0.0, 1.0, 0.0));
        assert_eq!(vertices[3], Vertex::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_short_vertex_record_is_skipped() {
        // Vertex 1 has only two tokens
        let text = "OFF\n5 1 0\n0 0 0\n1 0\n1 1 0\n0 1 0\n2 2 2\n4 0 1 2 3\n";
        let mesh = parse_off(text).unwrap();
        assert_eq!(mesh.len(), 1);
        let vertices = mesh.polygons[0].vertices();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1], Vertex::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_polygon_below_three_vertices_is_dropped() {
        let text = "OFF\n3 2 0\n0 0 0\n1 0\n1 1 0\n3 0 1 2\n3 0 2 0\n";
        let mesh = parse_off(text).unwrap();
        // The first face loses vertex 1 and falls to two vertices
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.polygons[0].len(), 3);
    }

    #[test]
    fn test_comments_do_not_shift_offsets() {
        let text = "# header comment\nOFF\n# counts follow\n4 1 0\n0 0 0\n# between vertices\n1 0 0\n1 1 0\n0 1 0\n#\n4 0 1 2 3\n";
        assert_eq!(parse_off(text).unwrap(), parse_off(QUAD).unwrap());
    }

    #[test]
    fn test_last_line_is_never_a_face() {
        // No trailing newline: the face record is the last line and is excluded
        let text = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2";
        assert!(parse_off(text).unwrap().is_empty());
    }

    #[test]
    fn test_leading_dot_decimals() {
        let text = "OFF\n3 1 0\n-.5 .25 0\n1 -.75 0\n0 1 .5\n3 0 1 2\n";
        let mesh = parse_off(text).unwrap();
        let vertices = mesh.polygons[0].vertices();
        assert_eq!(vertices[0], Vertex::new(-0.5, 0.25, 0.0));
        assert_eq!(vertices[1], Vertex::new(1.0, -0.75, 0.0));
        assert_eq!(vertices[2], Vertex::new(0.0, 1.0, 0.5));
    }

    #[test]
    fn test_continuations_and_whitespace() {
        let text = "OFF\r\n3 1 0\r\n  0\t0   0 \\\r\n1 0 0\r\n0 1 0\r\n3 0 1 2\r\n";
        let mesh = parse_off(text).unwrap();
        assert_eq!(mesh.polygons[0].vertices()[0], Vertex::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_malformed_number_becomes_nan() {
        let text = "OFF\n3 1 0\nabc 0 0\n1 0 0\n0 1 0\n3 0 1 2\n";
        let mesh = parse_off(text).unwrap();
        let first = mesh.polygons[0].vertices()[0];
        assert!(first.x().is_nan());
        assert_eq!(first.y(), 0.0);
    }

    #[test]
    fn test_out_of_range_index_is_skipped() {
        let text = "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n4 0 1 2 9\n";
        let mesh = parse_off(text).unwrap();
        assert_eq!(mesh.polygons[0].len(), 3);
    }

    #[test]
    fn test_face_count_beyond_listed_indices() {
        for count in ["5", "50000000", "9223372036854775807"] {
            let text = format!("OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n{count} 0 1 2\n");
            let mesh = parse_off(&text).unwrap();
            assert_eq!(mesh.len(), 1, "count {count}");
            assert_eq!(mesh.polygons[0].len(), 3, "count {count}");
        }
    }

    #[test]
    fn test_missing_header_is_an_error() {
        assert!(matches!(parse_off("OFF"), Err(LoadError::Parse(_))));
        assert!(matches!(parse_off("OFF\nnope\n"), Err(LoadError::Parse(_))));
        assert!(matches!(parse_off("OFF\n-3 1 0\n"), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_numeric_prefixes() {
        assert_eq!(parse_float("1.5e2abc"), 150.0);
        assert_eq!(parse_float("-0.5"), -0.5);
        assert_eq!(parse_float("7."), 7.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_float("").is_nan());
        assert!(parse_float("-").is_nan());

        assert_eq!(parse_int("12abc"), Some(12));
        assert_eq!(parse_int("-4"), Some(-4));
        assert_eq!(parse_int("3.9"), Some(3));
        assert_eq!(parse_int("x1"), None);
    }

    proptest! {
        /// Property: inserting comment lines anywhere never changes the parsed mesh
        #[test]
        fn comments_are_transparent(at in 0usize..8, comment in "#[ -~]{0,12}") {
            let mut lines: Vec<&str> = QUAD.split('\n').collect();
            let at = at.min(lines.len() - 1);
            lines.insert(at, &comment);
            let text = lines.join("\n");
            prop_assert_eq!(parse_off(&text).unwrap(), parse_off(QUAD).unwrap());
        }
    }
}
