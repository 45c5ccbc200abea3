//! Surface group to material bindings of the room model
//!
//! The table enumerates every group the model contained when the scene was
//! authored. Several visually distinct parts share the neutral material;
//! that grouping is kept as authored.

use crate::assets::RoomAsset;
use crate::resources::{Color, MaterialDefinition};

/// The room's palette of custom materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialSlot {
    Curtain,
    /// Color comes from the body texture
    Body,
    Table,
    Radiator,
    /// Computers, monitors and other electronics
    Component,
    Pillow,
    Chair,
    /// Shared default for the many small parts
    Neutral,
}

impl MaterialSlot {
    pub const ALL: [MaterialSlot; 8] = [
        MaterialSlot::Curtain,
        MaterialSlot::Body,
        MaterialSlot::Table,
        MaterialSlot::Radiator,
        MaterialSlot::Component,
        MaterialSlot::Pillow,
        MaterialSlot::Chair,
        MaterialSlot::Neutral,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MaterialSlot::Curtain => "curtain",
            MaterialSlot::Body => "body",
            MaterialSlot::Table => "table",
            MaterialSlot::Radiator => "radiator",
            MaterialSlot::Component => "comp",
            MaterialSlot::Pillow => "pillow",
            MaterialSlot::Chair => "chair",
            MaterialSlot::Neutral => "default",
        }
    }

    /// Flat color of the slot; `None` for the textured body
    pub fn color(self) -> Option<Color> {
        match self {
            MaterialSlot::Curtain => Some(Color::hex(0xd90429)),
            MaterialSlot::Body => None,
            MaterialSlot::Table => Some(Color::hex(0x582f0e)),
            MaterialSlot::Radiator => Some(Color::hex(0xa9a39d)),
            MaterialSlot::Component => Some(Color::hex(0x00000f)),
            MaterialSlot::Pillow => Some(Color::hex(0xffffcc)),
            MaterialSlot::Chair => Some(Color::hex(0x000000)),
            MaterialSlot::Neutral => Some(Color::hex(0xcccccc)),
        }
    }

    /// Definition for a flat-colored slot
    pub fn flat_definition(self) -> Option<MaterialDefinition> {
        self.color()
            .map(|color| MaterialDefinition::phong(self.name(), color))
    }
}

/// What a surface group is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Palette(MaterialSlot),
    /// Material of this name stored in the model
    Embedded(&'static str),
}

/// Group that receives the selective bloom
pub const SCREENS_GROUP: &str = "emis_lambert1_0";

/// Embedded material the screens are drawn with
pub const SCREENS_MATERIAL: &str = "lambert1";

use Binding::{Embedded, Palette};
use MaterialSlot::*;

pub const ROOM_BINDINGS: &[(&str, Binding)] = &[
    ("_________6_blinn1_0", Palette(Curtain)),
    ("body1_blinn1_0", Palette(Body)),
    ("cabin_blinn1_0", Palette(Table)),
    ("chair_body_blinn1_0", Palette(Chair)),
    ("comp_blinn1_0", Palette(Component)),
    ("miuse_blinn1_0", Palette(Pillow)),
    ("monitor2_blinn1_0", Palette(Component)),
    ("monitor3_blinn1_0", Palette(Component)),
    ("keyboard_blinn1_0", Palette(Component)),
    ("kovrik_blinn1_0", Palette(Component)),
    ("red_bttns_blinn1_0", Palette(Curtain)),
    ("tablet_blinn1_0", Palette(Component)),
    ("handls_blinn1_0", Palette(Neutral)),
    ("lamp_bl_blinn1_0", Palette(Neutral)),
    ("lamp_white_blinn1_0", Palette(Neutral)),
    ("pCylinder5_blinn1_0", Palette(Neutral)),
    ("pillows_blinn1_0", Palette(Pillow)),
    ("polySurface53_blinn1_0", Palette(Neutral)),
    ("radiator_blinn1_0", Palette(Radiator)),
    ("radiator_blinn1_0001", Palette(Neutral)),
    ("railing_blinn1_0", Palette(Curtain)),
    ("red_vac_blinn1_0", Palette(Neutral)),
    ("stylus_blinn1_0", Palette(Neutral)),
    ("table_blinn1_0", Palette(Table)),
    ("triangle_blinn1_0", Palette(Neutral)),
    ("vac_black_blinn1_0", Palette(Neutral)),
    ("vacuum1_blinn1_0", Palette(Neutral)),
    ("vacuumgrey_blinn1_0", Palette(Neutral)),
    ("vires_blinn1_0", Palette(Neutral)),
    ("window_blinn1_0", Palette(Neutral)),
    ("window4_phong1_0", Embedded("phong1")),
];

/// Bound groups and the screens group, in table order, that `asset` lacks
pub fn missing_groups(asset: &RoomAsset) -> Vec<&'static str> {
    ROOM_BINDINGS
        .iter()
        .map(|(group, _)| *group)
        .chain(std::iter::once(SCREENS_GROUP))
        .filter(|group| asset.group(group).is_none())
        .collect()
}

/// Embedded materials the bindings and the screens need that `asset` lacks
pub fn missing_materials(asset: &RoomAsset) -> Vec<&'static str> {
    ROOM_BINDINGS
        .iter()
        .filter_map(|(_, binding)| match binding {
            Embedded(name) => Some(*name),
            Palette(_) => None,
        })
        .chain(std::iter::once(SCREENS_MATERIAL))
        .filter(|name| asset.material(name).is_none())
        .collect()
}
