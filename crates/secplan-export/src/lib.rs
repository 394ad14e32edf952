//! Deliverable generation.
//!
//! Stateless functions over a project snapshot and its blob store:
//! FOV cone geometry, annotated floorplan PDFs, the spreadsheet
//! workbook, the audit CSV, and the zip package that bundles them.

pub mod deliverables;
pub mod fov;
pub mod overlay;
pub mod pdf;
pub mod sheet;

pub use deliverables::write_deliverables;
pub use fov::cone_polygon;
pub use overlay::annotated_floorplan;
pub use pdf::PdfDocument;
pub use sheet::{audit_csv, equipment_workbook, Workbook};
