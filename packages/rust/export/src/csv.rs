//! Tabular form: one row per (category, item) pair.

use std::io::{self, Write};
use std::path::Path;

use menucat_shared::{MenuCatError, MenuCatalog, Result};

/// Fixed column order of the table.
pub const HEADER: [&str; 9] = [
    "Restaurant Name",
    "Location",
    "Operating Hours",
    "Contact",
    "Category",
    "Item Name",
    "Description",
    "Price",
    "Veg Status",
];

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write one CRLF-terminated row, quoting fields as needed.
fn write_row<W: Write>(w: &mut W, row: &[&str]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\r\n")
}

/// Write the header and every row of `catalog` to `writer`.
pub fn write_csv<W: Write>(mut writer: W, catalog: &MenuCatalog) -> io::Result<()> {
    write_row(&mut writer, &HEADER)?;

    let restaurant = catalog.restaurant();
    for (category, item) in catalog.rows() {
        write_row(
            &mut writer,
            &[
                restaurant.name.as_str(),
                restaurant.location.as_str(),
                restaurant.hours.as_str(),
                restaurant.contact.as_str(),
                category,
                item.name.as_str(),
                item.description.as_str(),
                item.price.as_str(),
                item.veg_status.as_str(),
            ],
        )?;
    }
    writer.flush()
}

pub fn render_csv(catalog: &MenuCatalog) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, catalog).map_err(|e| MenuCatError::Export(format!("CSV write failed: {e}")))?;
    String::from_utf8(buf).map_err(|e| MenuCatError::Export(format!("CSV is not UTF-8: {e}")))
}

pub fn write_csv_file(path: &Path, catalog: &MenuCatalog) -> Result<()> {
    let csv = render_csv(catalog)?;
    crate::write_atomic(path, csv.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use menucat_shared::{MenuCategory, MenuItem, RestaurantInfo, VegStatus};

    fn restaurant() -> RestaurantInfo {
        RestaurantInfo {
            name: "Punjab Grill".into(),
            location: "Select Citywalk, Saket".into(),
            hours: "12:00 PM to 11:30 PM".into(),
            contact: "+91 11 4050 0000".into(),
            source_url: None,
        }
    }

    #[test]
    fn quoting_rules() {
        assert!(!needs_quotes("Dal Makhani"));
        assert!(needs_quotes("Saket, New Delhi"));
        assert!(needs_quotes("The \"house\" special"));
        assert!(needs_quotes("line one\nline two"));

        let mut buf = Vec::new();
        write_row(&mut buf, &["a", "b,c", "say \"hi\""]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a,\"b,c\",\"say \"\"hi\"\"\"\r\n");
    }

    #[test]
    fn header_then_one_row_per_item() {
        let mut starters = MenuCategory::new("Starters");
        starters.items.push(MenuItem {
            description: "Char-grilled, smoky".into(),
            veg_status: VegStatus::NonVeg,
            ..MenuItem::new("Chicken Tikka", "₹495")
        });
        starters.items.push(MenuItem::new("Papad", "₹60"));
        let mut breads = MenuCategory::new("Breads");
        breads.items.push(MenuItem::new("Naan", "₹70"));
        let catalog = MenuCatalog::new(restaurant(), vec![starters, breads]);

        let csv = render_csv(&catalog).unwrap();
        let lines: Vec<&str> = csv.split("\r\n").filter(|l| !l.is_empty()).collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Restaurant Name,Location,Operating Hours,Contact,Category,Item Name,Description,Price,Veg Status"
        );
        assert_eq!(
            lines[1],
            "Punjab Grill,\"Select Citywalk, Saket\",12:00 PM to 11:30 PM,+91 11 4050 0000,Starters,Chicken Tikka,\"Char-grilled, smoky\",₹495,Non-Veg"
        );
        assert!(lines[2].ends_with("Starters,Papad,,₹60,Unknown"));
        assert!(lines[3].contains(",Breads,Naan,"));
    }

    #[test]
    fn empty_catalog_is_header_only() {
        let csv = render_csv(&MenuCatalog::empty(restaurant())).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
