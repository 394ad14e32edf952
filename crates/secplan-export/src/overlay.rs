//! Annotated floorplan rendering.
//!
//! Produces one PDF page per floorplan page with every placed item
//! drawn as a vector glyph: FOV cones first, then equipment boxes,
//! annotations, and labels on top. Page geometry is US Letter, except
//! image-derived floorplans which keep their own aspect ratio at
//! letter width; source documents are referenced by the deliverables
//! package alongside the overlay rather than re-rasterized.

use crate::fov::cone_polygon;
use crate::pdf::{text_width, ContentStream, PdfDocument};
use secplan_project::model::{Floorplan, Item, ItemData, Project};

/// US Letter page width in points.
pub const PAGE_WIDTH: f64 = 612.0;
/// US Letter page height in points.
pub const PAGE_HEIGHT: f64 = 792.0;

const DEVICE_COLOR: &str = "#1565c0";
const MARKER_COLOR: &str = "#6a1b9a";
const FOV_FILL: &str = "#dbe7f5";
const LABEL_SIZE: f64 = 8.0;

/// Page size in points for a floorplan. Image-derived plans scale
/// their pixel dimensions to letter width; everything else is letter.
fn page_size(floorplan: &Floorplan) -> (f64, f64) {
    match floorplan.source.as_ref().and_then(|s| s.pixel_size) {
        Some((w, h)) if w > 0 && h > 0 => {
            (PAGE_WIDTH, h as f64 * PAGE_WIDTH / w as f64)
        }
        _ => (PAGE_WIDTH, PAGE_HEIGHT),
    }
}

/// Render the annotated overlay document for one floorplan.
pub fn annotated_floorplan(project: &Project, floorplan: &Floorplan) -> PdfDocument {
    let items = project.items_on(floorplan.id);
    let (page_width, page_height) = page_size(floorplan);
    let mut doc = PdfDocument::new();

    for page in 0..floorplan.page_count.max(1) {
        let page_items: Vec<&Item> = items
            .iter()
            .filter(|item| {
                item.placement
                    .map(|p| p.page == page)
                    .unwrap_or(false)
            })
            .copied()
            .collect();

        doc.add_page(page_width, page_height, |c| {
            draw_frame(c, floorplan, page, page_width, page_height);
            for item in &page_items {
                draw_fov(c, item);
            }
            for item in &page_items {
                draw_item(c, item);
            }
        });
    }
    doc
}

fn draw_frame(c: &mut ContentStream, floorplan: &Floorplan, page: u32, width: f64, height: f64) {
    c.stroke_color("#9e9e9e")
        .line_width(0.75)
        .stroke_rect(18.0, 30.0, width - 36.0, height - 48.0);
    c.fill_color("#000000").text(
        18.0,
        22.0,
        11.0,
        &format!("{} - page {}", floorplan.name, page + 1),
    );
}

fn draw_fov(c: &mut ContentStream, item: &Item) {
    let ItemData::Device(device) = &item.data else {
        return;
    };
    let (Some(placement), Some(fov)) = (item.placement, &device.fov) else {
        return;
    };
    let center_x = placement.x + item.width / 2.0;
    let center_y = placement.y + item.height / 2.0;
    let polygon = cone_polygon(center_x, center_y, fov);
    c.fill_color(FOV_FILL).fill_polygon(&polygon);
}

fn draw_item(c: &mut ContentStream, item: &Item) {
    let Some(placement) = item.placement else {
        return;
    };
    let (x, y) = (placement.x, placement.y);

    match &item.data {
        ItemData::Device(device) => {
            c.stroke_color(DEVICE_COLOR)
                .line_width(1.2)
                .stroke_rect(x, y, item.width, item.height);
            draw_label(c, item, &device.label);
        }
        ItemData::Marker(marker) => {
            c.stroke_color(MARKER_COLOR)
                .line_width(1.2)
                .stroke_rect(x, y, item.width, item.height);
            // Diagonal cross distinguishes markers from devices
            c.line(x, y, x + item.width, y + item.height);
            c.line(x + item.width, y, x, y + item.height);
            draw_label(c, item, &marker.label);
        }
        ItemData::Text(text) => {
            if let Some(fill) = &text.fill {
                c.fill_color(fill).fill_rect(x, y, item.width, item.height);
            }
            if text.border {
                c.stroke_color("#000000")
                    .line_width(0.75)
                    .stroke_rect(x, y, item.width, item.height);
            }
            c.fill_color("#000000")
                .text(x + 2.0, y + text.font_size, text.font_size, &text.content);
        }
        ItemData::Draw(draw) => {
            if draw.points.len() < 2 {
                return;
            }
            let absolute: Vec<(f64, f64)> = draw
                .points
                .iter()
                .map(|(px, py)| (x + px, y + py))
                .collect();
            c.stroke_color(&draw.stroke.color)
                .line_width(draw.stroke.width)
                .polyline(&absolute);
        }
        ItemData::Rectangle(rect) => {
            if let Some(fill) = &rect.fill {
                c.fill_color(fill).fill_rect(x, y, item.width, item.height);
            }
            c.stroke_color(&rect.stroke.color)
                .line_width(rect.stroke.width)
                .stroke_rect(x, y, item.width, item.height);
        }
        ItemData::Conduit(conduit) => {
            c.stroke_color(&conduit.stroke.color)
                .line_width(conduit.stroke.width)
                .line(x, y, x + conduit.end_x, y + conduit.end_y);
        }
    }
}

fn draw_label(c: &mut ContentStream, item: &Item, label: &str) {
    if label.is_empty() {
        return;
    }
    let Some(placement) = item.placement else {
        return;
    };
    // Centered under the glyph
    let x = placement.x + item.width / 2.0 - text_width(label, LABEL_SIZE) / 2.0;
    let y = placement.y + item.height + LABEL_SIZE + 1.0;
    c.fill_color("#000000").text(x, y, LABEL_SIZE, label);
}

#[cfg(test)]
mod tests {
    use super::*;
    use secplan_core::catalog::DeviceKind;
    use secplan_project::model::Placement;
    use secplan_project::{factory, Floorplan};

    fn plan_with_camera() -> (Project, Floorplan) {
        let mut project = Project::new("Overlay");
        let mut plan = Floorplan::new("Lobby");
        plan.page_count = 2;
        let plan_id = plan.id;
        project.floorplans.push(plan.clone());

        let mut camera = factory::new_device(DeviceKind::DomeCamera);
        camera.placement = Some(Placement {
            floorplan: plan_id,
            page: 1,
            x: 100.0,
            y: 200.0,
        });
        let id = camera.id;
        project.inventory.insert(id, camera);
        project.floorplan_mut(plan_id).unwrap().placed.insert(id);
        let plan = project.floorplans[0].clone();
        (project, plan)
    }

    #[test]
    fn one_pdf_page_per_floorplan_page() {
        let (project, plan) = plan_with_camera();
        let doc = annotated_floorplan(&project, &plan);
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn camera_glyph_label_and_fov_appear_in_the_output() {
        let (project, plan) = plan_with_camera();
        let bytes = annotated_floorplan(&project, &plan).render();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Dome Camera)"));
        // The FOV fill color only shows up when the cone was drawn
        assert!(text.contains("0.859 0.906 0.961 rg"));
    }

    #[test]
    fn image_derived_floorplan_keeps_its_aspect_ratio() {
        let project = Project::new("Retail");
        let mut plan = Floorplan::new("Storefront");
        plan.source = Some(secplan_project::FloorplanSource {
            filename: "storefront.png".to_string(),
            pixel_size: Some((800, 600)),
        });
        let bytes = annotated_floorplan(&project, &plan).render();
        let text = String::from_utf8_lossy(&bytes);
        // 600px scaled to letter width: 600 * 612 / 800
        assert!(text.contains("/MediaBox [0 0 612.00 459.00]"));
    }

    #[test]
    fn bare_floorplan_still_renders_its_frame() {
        let project = Project::new("Empty");
        let plan = Floorplan::new("Shell");
        let bytes = annotated_floorplan(&project, &plan).render();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("(Shell - page 1)"));
    }
}
