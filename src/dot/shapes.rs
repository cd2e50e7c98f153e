//! Known node shape names
//!
//!     The fact table behind the checker's shape-name sanity diagnostic.
//!     Entries are stored lowercased; lookups are case-insensitive because
//!     Graphviz accepts any casing for shape values.

use std::collections::HashSet;

use once_cell::sync::Lazy;

static SHAPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "assembly",
        "box",
        "box3d",
        "cds",
        "circle",
        "component",
        "cylinder",
        "diamond",
        "doublecircle",
        "doubleoctagon",
        "egg",
        "ellipse",
        "fivepoverhang",
        "folder",
        "hexagon",
        "house",
        "insulator",
        "invhouse",
        "invtrapezium",
        "invtriangle",
        "larrow",
        "lpromoter",
        "mcircle",
        "mdiamond",
        "mrecord",
        "msquare",
        "none",
        "note",
        "noverhang",
        "octagon",
        "oval",
        "parallelogram",
        "pentagon",
        "plain",
        "plaintext",
        "point",
        "polygon",
        "primersite",
        "promoter",
        "proteasesite",
        "proteinstab",
        "rarrow",
        "record",
        "rect",
        "rectangle",
        "restrictionsite",
        "ribosite",
        "rnastab",
        "rpromoter",
        "septagon",
        "signature",
        "square",
        "star",
        "tab",
        "terminator",
        "threepoverhang",
        "trapezium",
        "triangle",
        "underline",
        "utr",
    ])
});

/// True when the text names a known shape, ignoring case.
pub fn is_valid_shape(name: &str) -> bool {
    SHAPES.contains(name.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_shapes() {
        assert!(is_valid_shape("box"));
        assert!(is_valid_shape("doublecircle"));
        assert!(is_valid_shape("Mdiamond"));
        assert!(is_valid_shape("PLAINTEXT"));
    }

    #[test]
    fn test_unknown_shapes() {
        assert!(!is_valid_shape("circl"));
        assert!(!is_valid_shape("boxes"));
        assert!(!is_valid_shape(""));
    }
}
