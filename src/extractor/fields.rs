//! Labels and markers of the source site's entry tables.
//!
//! The canonical pseudo-labels are the label texts printed on the pages
//! (minus the trailing colon) and are reused verbatim as export columns.

/// Entry number, kept as text.
pub const IDENTIFIER: &str = "Nº";
pub const NAME: &str = "Nome";
/// Category list, `/`-separated on the page.
pub const CATEGORY: &str = "Tipo";
pub const PRIMARY_IMAGE: &str = "Imagem";
/// Alternate coloration image; exported as a plain attribute.
pub const VARIANT_IMAGE: &str = "Coloração Shiny";

/// Case-folded phrase announcing the variant image row.
pub const VARIANT_MARKER: &str = "coloração shiny";
/// Substring of a first cell whose row also carries the variant image.
pub const NAME_MARKER: &str = "Nome:";

/// Separator between categories in the category cell.
pub const CATEGORY_SEPARATOR: &str = "/";

/// Labels routed to canonical [`Record`](super::Record) fields.
pub const CANONICAL: [&str; 4] = [IDENTIFIER, NAME, CATEGORY, PRIMARY_IMAGE];

pub fn is_canonical(label: &str) -> bool {
    CANONICAL.contains(&label)
}
