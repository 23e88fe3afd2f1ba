//! The canonical permit-record schema and header alias map
//!
//! Every output table carries exactly these 21 columns, in this order,
//! followed by the `source_file` tag added by the merge engine. Input
//! headers are reconciled against [`HEADER_ALIASES`] before projection.

/// The fixed output column set, in output order
pub const CANONICAL_COLUMNS: [&str; 21] = [
    "אזור",
    "גוש",
    "הערות_לעצים",
    "חלקה",
    "מבקש",
    "מספר",
    "מספר_עצים",
    "מספר_רשיון",
    "מקום_הפעולה",
    "מתאריך",
    "סוג_העץ",
    "סיבה",
    "עד_תאריך",
    "פעולה",
    "פרטי_הסיבה",
    "רחוב",
    "שם_העץ",
    "שם_מאשר",
    "תאריך_אחרון_להגשת_ערער",
    "תאריך_הרשיון",
    "תפקיד_מאשר",
];

/// Name of the per-row provenance column appended by the merge engine
pub const SOURCE_COLUMN: &str = "source_file";

/// Known header spellings mapped to canonical column names
///
/// Total over both legacy and canonical spellings: every canonical name
/// maps to itself, and every historically-seen variant (embedded spaces,
/// legacy phrasing) maps to its canonical counterpart.
pub const HEADER_ALIASES: &[(&str, &str)] = &[
    ("אזור", "אזור"),
    ("גוש", "גוש"),
    ("הערות לעץ", "הערות_לעצים"),
    ("הערות_לעצים", "הערות_לעצים"),
    ("חלקה", "חלקה"),
    ("מבקש", "מבקש"),
    ("מספר", "מספר"),
    ("מספר עצים", "מספר_עצים"),
    ("מספר_עצים", "מספר_עצים"),
    ("מספר רשיון", "מספר_רשיון"),
    ("מספר_רשיון", "מספר_רשיון"),
    ("מקום הפעולה", "מקום_הפעולה"),
    ("מקום_הפעולה", "מקום_הפעולה"),
    ("מתאריך", "מתאריך"),
    ("סוג העץ", "סוג_העץ"),
    ("סוג_העץ", "סוג_העץ"),
    ("סיבה", "סיבה"),
    ("עד תאריך", "עד_תאריך"),
    ("עד_תאריך", "עד_תאריך"),
    ("פעולה", "פעולה"),
    ("פרטי הסיבה", "פרטי_הסיבה"),
    ("פרטי_הסיבה", "פרטי_הסיבה"),
    ("רחוב", "רחוב"),
    ("שם העץ", "שם_העץ"),
    ("שם_העץ", "שם_העץ"),
    ("שם מאשר", "שם_מאשר"),
    ("שם_מאשר", "שם_מאשר"),
    ("תאריך אחרון להגשת ערער", "תאריך_אחרון_להגשת_ערער"),
    ("תאריך_אחרון_להגשת_ערער", "תאריך_אחרון_להגשת_ערער"),
    ("תאריך הרשיון", "תאריך_הרשיון"),
    ("תאריך_הרשיון", "תאריך_הרשיון"),
    ("תפקיד מאשר", "תפקיד_מאשר"),
    ("תפקיד_מאשר", "תפקיד_מאשר"),
];

/// Resolve a raw header label to its canonical name
///
/// The label is trimmed, then looked up in the alias map. Unrecognized
/// labels are returned trimmed but otherwise unchanged; the normalizer's
/// projection step drops them later unless they equal a canonical name.
pub fn resolve_header(label: &str) -> String {
    let trimmed = label.trim();
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == trimmed)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Check whether a label is an auto-generated index column
///
/// Saving a table without suppressing the index and re-importing it leaves
/// placeholder labels like "Unnamed: 0"; these carry no data.
pub fn is_synthetic_index(label: &str) -> bool {
    label.starts_with("Unnamed")
}

/// The full output column sequence: canonical columns, then the source tag
pub fn output_columns() -> Vec<&'static str> {
    let mut columns: Vec<&str> = CANONICAL_COLUMNS.to_vec();
    columns.push(SOURCE_COLUMN);
    columns
}
