use super::{CatalogCategory, CatalogItem, DefectDefinition};
use crate::workflows::inspection::domain::Severity;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub(super) const VERSION: &str = "standard-2024.1";

fn defect(description: &str, hundredths: i64) -> DefectDefinition {
    DefectDefinition {
        description: description.to_string(),
        weight: Decimal::new(hundredths, 2),
        life_threatening: false,
    }
}

fn critical(description: &str, hundredths: i64) -> DefectDefinition {
    DefectDefinition {
        life_threatening: true,
        ..defect(description, hundredths)
    }
}

fn item(
    name: &str,
    requirement: &str,
    education: &str,
    tiers: [(Severity, Vec<DefectDefinition>); 3],
) -> CatalogItem {
    let defects: BTreeMap<Severity, Vec<DefectDefinition>> = tiers
        .into_iter()
        .filter(|(_, defects)| !defects.is_empty())
        .collect();

    CatalogItem {
        name: name.to_string(),
        requirement: requirement.to_string(),
        education: education.to_string(),
        defects,
    }
}

pub(super) fn categories() -> Vec<CatalogCategory> {
    vec![
        CatalogCategory {
            name: "Site".to_string(),
            items: vec![
                item(
                    "Fencing and Gates",
                    "Fences and gates are intact and secure where they control access or separate hazards.",
                    "Check latches, posts, and panels along the full perimeter and at pool enclosures.",
                    [
                        (Severity::Low, vec![defect("Holes or missing sections", 55)]),
                        (Severity::Moderate, vec![defect("Damaged or falling gate", 120)]),
                        (Severity::Severe, vec![]),
                    ],
                ),
                item(
                    "Walkways and Steps",
                    "Walkways, ramps, and exterior steps are free of trip hazards.",
                    "A vertical displacement of 3/4 inch or more is a trip hazard.",
                    [
                        (Severity::Low, vec![defect("Cracks or spalling", 75)]),
                        (
                            Severity::Moderate,
                            vec![defect("Broken or missing hand railing", 190)],
                        ),
                        (Severity::Severe, vec![defect("Trip hazard", 300)]),
                    ],
                ),
                item(
                    "Parking Lots and Driveways",
                    "Paved surfaces are free of ponding, potholes, and deterioration.",
                    "Note ponding only when 3 inches deep or more and covering 5 square feet.",
                    [
                        (Severity::Low, vec![defect("Cracks", 45)]),
                        (Severity::Moderate, vec![defect("Ponding", 110)]),
                        (Severity::Severe, vec![defect("Potholes or loose material", 250)]),
                    ],
                ),
            ],
        },
        CatalogCategory {
            name: "Building Exterior".to_string(),
            items: vec![
                item(
                    "Doors",
                    "Exterior doors open, close, latch, and lock as designed.",
                    "Fire-rated doors must self-close and latch fully.",
                    [
                        (Severity::Low, vec![defect("Damaged surface or frame", 60)]),
                        (Severity::Moderate, vec![defect("Damaged or missing hardware", 150)]),
                        (
                            Severity::Severe,
                            vec![critical("Fire-rated door does not self-close", 420)],
                        ),
                    ],
                ),
                item(
                    "Roofs",
                    "Roof covering, drainage, and flashing prevent water intrusion.",
                    "Inspect from grade or accessible vantage points only.",
                    [
                        (Severity::Low, vec![defect("Damaged gutters or downspouts", 80)]),
                        (Severity::Moderate, vec![defect("Missing or damaged shingles", 200)]),
                        (Severity::Severe, vec![defect("Structural damage or ponding", 450)]),
                    ],
                ),
                item(
                    "Windows",
                    "Windows are weathertight and operable where designed to open.",
                    "Security bars on sleeping-room windows must have a quick release.",
                    [
                        (Severity::Low, vec![defect("Cracked or broken panes", 90)]),
                        (Severity::Moderate, vec![defect("Damaged sills or frames", 165)]),
                        (
                            Severity::Severe,
                            vec![critical("Security bars prevent egress", 500)],
                        ),
                    ],
                ),
            ],
        },
        CatalogCategory {
            name: "Building Systems".to_string(),
            items: vec![
                item(
                    "Electrical System",
                    "Panels, wiring, and devices are enclosed and free of exposed conductors.",
                    "Any exposed energized part within reach is an immediate hazard.",
                    [
                        (Severity::Low, vec![defect("Missing breaker labels", 50)]),
                        (Severity::Moderate, vec![defect("Blocked access to panel", 180)]),
                        (
                            Severity::Severe,
                            vec![
                                critical("Exposed wires or open panels", 500),
                                defect("Evidence of leaks or corrosion", 300),
                            ],
                        ),
                    ],
                ),
                item(
                    "Fire Protection",
                    "Extinguishers, sprinklers, and alarm systems are present and serviced.",
                    "Extinguisher tags must show service within the last 12 months.",
                    [
                        (Severity::Low, vec![defect("Expired extinguisher tag", 100)]),
                        (Severity::Moderate, vec![defect("Missing sprinkler head escutcheon", 200)]),
                        (
                            Severity::Severe,
                            vec![critical("Missing or inoperable fire extinguisher", 450)],
                        ),
                    ],
                ),
                item(
                    "Domestic Water",
                    "Water heaters and distribution piping are sound and properly vented.",
                    "Pressure relief valves need a discharge line to within 6 inches of the floor.",
                    [
                        (Severity::Low, vec![defect("Leaking valve or fitting", 65)]),
                        (Severity::Moderate, vec![defect("Missing relief valve discharge line", 220)]),
                        (
                            Severity::Severe,
                            vec![critical("Gas-fired heater misaligned flue", 500)],
                        ),
                    ],
                ),
            ],
        },
        CatalogCategory {
            name: "Common Areas".to_string(),
            items: vec![
                item(
                    "Stairs and Corridors",
                    "Interior circulation paths are lit, clear, and structurally sound.",
                    "Any blocked path of egress is recorded regardless of duration.",
                    [
                        (Severity::Low, vec![defect("Damaged floor covering", 55)]),
                        (Severity::Moderate, vec![defect("Inoperable lighting", 140)]),
                        (Severity::Severe, vec![critical("Blocked egress", 500)]),
                    ],
                ),
                item(
                    "Laundry Room",
                    "Shared laundry equipment is vented and the room is sanitary.",
                    "Dryer vents must terminate outdoors without disconnection.",
                    [
                        (Severity::Low, vec![defect("Damaged walls or ceilings", 40)]),
                        (Severity::Moderate, vec![defect("Dryer vent missing or disconnected", 170)]),
                        (Severity::Severe, vec![]),
                    ],
                ),
            ],
        },
        CatalogCategory {
            name: "Units".to_string(),
            items: vec![
                item(
                    "Bathroom",
                    "Fixtures drain, flush, and seal; ventilation is operable.",
                    "Run every fixture and exhaust fan during the inspection.",
                    [
                        (Severity::Low, vec![defect("Damaged lavatory or sink", 70)]),
                        (
                            Severity::Moderate,
                            vec![defect("Inoperable exhaust fan", 130), defect("Plumbing leak", 180)],
                        ),
                        (Severity::Severe, vec![defect("Toilet missing or inoperable", 350)]),
                    ],
                ),
                item(
                    "Kitchen",
                    "Range, refrigerator, and cabinets are present and operational.",
                    "Test every burner and confirm the refrigerator holds temperature.",
                    [
                        (Severity::Low, vec![defect("Damaged cabinets or countertops", 60)]),
                        (Severity::Moderate, vec![defect("Range burner inoperable", 160)]),
                        (Severity::Severe, vec![defect("Refrigerator inoperable", 300)]),
                    ],
                ),
                item(
                    "Smoke Detectors",
                    "A working smoke detector serves every sleeping area and each level.",
                    "Press the test button on every detector; hardwired units must sound.",
                    [
                        (Severity::Low, vec![]),
                        (Severity::Moderate, vec![]),
                        (
                            Severity::Severe,
                            vec![critical("Missing or inoperable smoke detector", 500)],
                        ),
                    ],
                ),
                item(
                    "Walls and Ceilings",
                    "Surfaces are free of holes, water damage, and deteriorated paint.",
                    "Peeling paint in pre-1978 buildings may indicate a lead hazard.",
                    [
                        (Severity::Low, vec![defect("Peeling or needs paint", 45)]),
                        (Severity::Moderate, vec![defect("Water stains or mold", 150)]),
                        (Severity::Severe, vec![defect("Large holes or buckling", 275)]),
                    ],
                ),
            ],
        },
    ]
}
