use crate::domain::clean::CleanListing;
use crate::domain::listing::LISTING_COLUMNS;
use crate::errors::ServerError;
use crate::responses::xlsx_response;
use crate::responses::ResultResp;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

const DERIVED_COLUMNS: [&str; 2] = ["price_per_sqft", "amenity_score"];

pub fn export_listings_xlsx(listings: &[CleanListing]) -> ResultResp {
    let buffer = listings_workbook(listings)
        .map_err(|e| ServerError::XlsxError(format!("Failed to build workbook: {e}")))?;

    xlsx_response(buffer, "nairobi_listings.xlsx")
}

pub fn listings_workbook(listings: &[CleanListing]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // Headers
    for (col, header) in LISTING_COLUMNS.iter().chain(DERIVED_COLUMNS.iter()).enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    // Rows
    for (i, listing) in listings.iter().enumerate() {
        write_row(worksheet, (i + 1) as u32, listing)?;
    }

    workbook.save_to_buffer()
}

// Absent values stay blank cells, not zeros.
fn write_row(ws: &mut Worksheet, r: u32, listing: &CleanListing) -> Result<(), XlsxError> {
    let rec = &listing.record;

    ws.write_string(r, 0, &rec.location)?;
    ws.write_string(r, 1, rec.property_type.as_str())?;
    if let Some(b) = rec.bedrooms {
        ws.write_number(r, 2, b as f64)?;
    }
    if let Some(b) = rec.bathrooms {
        ws.write_number(r, 3, b)?;
    }
    if let Some(s) = rec.size_sqm {
        ws.write_number(r, 4, s)?;
    }
    ws.write_string(r, 5, &rec.amenities_joined())?;
    ws.write_number(r, 6, rec.price_kes as f64)?;
    if let Some(d) = rec.listing_date {
        ws.write_string(r, 7, &d.format("%Y-%m-%d").to_string())?;
    }
    if let Some(p) = listing.price_per_sqft {
        ws.write_number(r, 8, p)?;
    }
    ws.write_number(r, 9, listing.amenity_score as f64)?;

    Ok(())
}

/// The same table as CSV bytes, for the download route.
pub fn listings_csv(listings: &[CleanListing]) -> Result<Vec<u8>, ServerError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());

    let header: Vec<&str> = LISTING_COLUMNS.iter().chain(DERIVED_COLUMNS.iter()).copied().collect();
    wtr.write_record(&header)
        .map_err(|e| ServerError::ExportError(e.to_string()))?;

    for l in listings {
        wtr.write_record(l.cells())
            .map_err(|e| ServerError::ExportError(e.to_string()))?;
    }

    wtr.into_inner()
        .map_err(|e| ServerError::ExportError(e.to_string()))
}
