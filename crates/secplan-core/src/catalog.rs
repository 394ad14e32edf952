//! Equipment catalog - static device and marker definitions
//!
//! This module provides:
//! - Device and marker kind enumerations
//! - Display metadata (label, icon, category) per kind
//! - Default placement geometry per kind
//! - Field-of-view defaults for camera-class devices
//! - Unit price hints consumed by the cost calculator
//!
//! The catalog is pure data: every kind maps to exactly one static
//! entry, and lookups are total over the closed enumerations.

use serde::{Deserialize, Serialize};

/// Equipment categories for grouping and deliverable organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum EquipmentCategory {
    /// Video surveillance equipment
    Video,
    /// Access control equipment (doors, readers, locks)
    AccessControl,
    /// Intrusion detection equipment
    Intrusion,
    /// Communication equipment (intercoms, speakers)
    Communication,
    /// Supporting infrastructure (panels, power, network)
    Infrastructure,
    /// Plan annotations that are not physical equipment
    Annotation,
}

impl std::fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => write!(f, "Video"),
            Self::AccessControl => write!(f, "Access Control"),
            Self::Intrusion => write!(f, "Intrusion"),
            Self::Communication => write!(f, "Communication"),
            Self::Infrastructure => write!(f, "Infrastructure"),
            Self::Annotation => write!(f, "Annotation"),
        }
    }
}

/// Device kinds placeable on a floorplan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum DeviceKind {
    /// Fixed dome camera
    DomeCamera,
    /// Bullet camera
    BulletCamera,
    /// Pan-tilt-zoom camera
    PtzCamera,
    /// 360-degree fisheye camera
    FisheyeCamera,
    /// Monitored door with position switch
    DoorContact,
    /// Credential reader at a door
    CardReader,
    /// Electrified lock hardware
    ElectricStrike,
    /// Passive infrared motion sensor
    MotionSensor,
    /// Acoustic glass-break sensor
    GlassBreakSensor,
    /// Arm/disarm keypad
    Keypad,
    /// Audio/video intercom station
    Intercom,
    /// Head-end alarm or access panel
    ControlPanel,
}

impl DeviceKind {
    /// Get all device kinds
    pub fn all() -> &'static [DeviceKind] {
        &[
            DeviceKind::DomeCamera,
            DeviceKind::BulletCamera,
            DeviceKind::PtzCamera,
            DeviceKind::FisheyeCamera,
            DeviceKind::DoorContact,
            DeviceKind::CardReader,
            DeviceKind::ElectricStrike,
            DeviceKind::MotionSensor,
            DeviceKind::GlassBreakSensor,
            DeviceKind::Keypad,
            DeviceKind::Intercom,
            DeviceKind::ControlPanel,
        ]
    }

    /// Whether this kind renders a field-of-view cone
    pub fn has_fov(&self) -> bool {
        matches!(
            self,
            DeviceKind::DomeCamera
                | DeviceKind::BulletCamera
                | DeviceKind::PtzCamera
                | DeviceKind::FisheyeCamera
        )
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.entry().label)
    }
}

/// Marker kinds placeable on a floorplan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum MarkerKind {
    /// Equipment riser / IDF closet location
    RiserLocation,
    /// Power supply location
    PowerSupply,
    /// Network drop location
    NetworkDrop,
    /// Monitor or workstation location
    Workstation,
    /// Free-form point of interest
    PointOfInterest,
}

impl MarkerKind {
    /// Get all marker kinds
    pub fn all() -> &'static [MarkerKind] {
        &[
            MarkerKind::RiserLocation,
            MarkerKind::PowerSupply,
            MarkerKind::NetworkDrop,
            MarkerKind::Workstation,
            MarkerKind::PointOfInterest,
        ]
    }
}

impl std::fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.entry().label)
    }
}

/// Field-of-view defaults for camera-class devices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FovDefaults {
    /// Cone opening angle in degrees
    pub angle_deg: f64,
    /// Cone reach in page units
    pub distance: f64,
}

/// Static display and default metadata for one catalog kind
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Display label
    pub label: &'static str,
    /// Icon asset name
    pub icon: &'static str,
    /// Grouping category
    pub category: EquipmentCategory,
    /// Default placed width in page units
    pub default_width: f64,
    /// Default placed height in page units
    pub default_height: f64,
    /// FOV defaults, present only for camera-class kinds
    pub fov: Option<FovDefaults>,
    /// Unit price hint in whole currency units, for cost estimates
    pub unit_price: Option<f64>,
}

impl DeviceKind {
    /// Look up the static catalog entry for this kind.
    ///
    /// Total over the enumeration; every kind has exactly one entry.
    pub fn entry(&self) -> &'static CatalogEntry {
        match self {
            DeviceKind::DomeCamera => &CatalogEntry {
                label: "Dome Camera",
                icon: "camera-dome",
                category: EquipmentCategory::Video,
                default_width: 24.0,
                default_height: 24.0,
                fov: Some(FovDefaults {
                    angle_deg: 90.0,
                    distance: 120.0,
                }),
                unit_price: Some(450.0),
            },
            DeviceKind::BulletCamera => &CatalogEntry {
                label: "Bullet Camera",
                icon: "camera-bullet",
                category: EquipmentCategory::Video,
                default_width: 24.0,
                default_height: 24.0,
                fov: Some(FovDefaults {
                    angle_deg: 60.0,
                    distance: 160.0,
                }),
                unit_price: Some(380.0),
            },
            DeviceKind::PtzCamera => &CatalogEntry {
                label: "PTZ Camera",
                icon: "camera-ptz",
                category: EquipmentCategory::Video,
                default_width: 28.0,
                default_height: 28.0,
                fov: Some(FovDefaults {
                    angle_deg: 110.0,
                    distance: 200.0,
                }),
                unit_price: Some(1450.0),
            },
            DeviceKind::FisheyeCamera => &CatalogEntry {
                label: "Fisheye Camera",
                icon: "camera-fisheye",
                category: EquipmentCategory::Video,
                default_width: 26.0,
                default_height: 26.0,
                fov: Some(FovDefaults {
                    angle_deg: 360.0,
                    distance: 90.0,
                }),
                unit_price: Some(820.0),
            },
            DeviceKind::DoorContact => &CatalogEntry {
                label: "Door Contact",
                icon: "door-contact",
                category: EquipmentCategory::AccessControl,
                default_width: 20.0,
                default_height: 20.0,
                fov: None,
                unit_price: Some(65.0),
            },
            DeviceKind::CardReader => &CatalogEntry {
                label: "Card Reader",
                icon: "card-reader",
                category: EquipmentCategory::AccessControl,
                default_width: 20.0,
                default_height: 20.0,
                fov: None,
                unit_price: Some(310.0),
            },
            DeviceKind::ElectricStrike => &CatalogEntry {
                label: "Electric Strike",
                icon: "electric-strike",
                category: EquipmentCategory::AccessControl,
                default_width: 20.0,
                default_height: 20.0,
                fov: None,
                unit_price: Some(240.0),
            },
            DeviceKind::MotionSensor => &CatalogEntry {
                label: "Motion Sensor",
                icon: "motion-sensor",
                category: EquipmentCategory::Intrusion,
                default_width: 20.0,
                default_height: 20.0,
                fov: None,
                unit_price: Some(85.0),
            },
            DeviceKind::GlassBreakSensor => &CatalogEntry {
                label: "Glass Break Sensor",
                icon: "glass-break",
                category: EquipmentCategory::Intrusion,
                default_width: 20.0,
                default_height: 20.0,
                fov: None,
                unit_price: Some(95.0),
            },
            DeviceKind::Keypad => &CatalogEntry {
                label: "Keypad",
                icon: "keypad",
                category: EquipmentCategory::Intrusion,
                default_width: 20.0,
                default_height: 24.0,
                fov: None,
                unit_price: Some(140.0),
            },
            DeviceKind::Intercom => &CatalogEntry {
                label: "Intercom",
                icon: "intercom",
                category: EquipmentCategory::Communication,
                default_width: 22.0,
                default_height: 26.0,
                fov: None,
                unit_price: Some(520.0),
            },
            DeviceKind::ControlPanel => &CatalogEntry {
                label: "Control Panel",
                icon: "control-panel",
                category: EquipmentCategory::Infrastructure,
                default_width: 32.0,
                default_height: 40.0,
                fov: None,
                unit_price: Some(980.0),
            },
        }
    }
}

impl MarkerKind {
    /// Look up the static catalog entry for this kind.
    pub fn entry(&self) -> &'static CatalogEntry {
        match self {
            MarkerKind::RiserLocation => &CatalogEntry {
                label: "Riser Location",
                icon: "riser",
                category: EquipmentCategory::Infrastructure,
                default_width: 24.0,
                default_height: 24.0,
                fov: None,
                unit_price: None,
            },
            MarkerKind::PowerSupply => &CatalogEntry {
                label: "Power Supply",
                icon: "power-supply",
                category: EquipmentCategory::Infrastructure,
                default_width: 22.0,
                default_height: 22.0,
                fov: None,
                unit_price: Some(180.0),
            },
            MarkerKind::NetworkDrop => &CatalogEntry {
                label: "Network Drop",
                icon: "network-drop",
                category: EquipmentCategory::Infrastructure,
                default_width: 18.0,
                default_height: 18.0,
                fov: None,
                unit_price: Some(110.0),
            },
            MarkerKind::Workstation => &CatalogEntry {
                label: "Workstation",
                icon: "workstation",
                category: EquipmentCategory::Infrastructure,
                default_width: 26.0,
                default_height: 22.0,
                fov: None,
                unit_price: Some(1600.0),
            },
            MarkerKind::PointOfInterest => &CatalogEntry {
                label: "Point of Interest",
                icon: "poi",
                category: EquipmentCategory::Annotation,
                default_width: 18.0,
                default_height: 18.0,
                fov: None,
                unit_price: None,
            },
        }
    }
}
