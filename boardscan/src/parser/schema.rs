//! Board model definitions.
//!
//! Every entity parsed out of a `.kicad_pcb` file lives in the [`Board`]
//! aggregate. Collections keep declaration order, and cross references are
//! indices into the owning collection, resolved while parsing; a reference
//! that cannot be resolved is kept as an explicit unresolved marker rather
//! than dropped.

use serde::{Deserialize, Serialize};

use crate::parser::sexp::Span;

/// Lifecycle of a parsed section: `Unset` before its group is seen, `Open`
/// while the group's interior is being consumed, `Closed` afterwards. A
/// closed section never reopens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionState {
    Unset,
    Open,
    Closed,
}

impl Default for SectionState {
    fn default() -> Self {
        SectionState::Unset
    }
}

/// Tri-state section marker plus the byte extent of the section's group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionIndex {
    pub state: SectionState,
    pub span: Span,
}

impl SectionIndex {
    /// Transition `Unset -> Open`, recording the group extent. Any other
    /// starting state is left untouched.
    pub fn open(&mut self, span: Span) {
        if self.state == SectionState::Unset {
            self.state = SectionState::Open;
            self.span = span;
        }
    }

    /// Transition `Open -> Closed`. A section that never opened, or that
    /// already closed, is left untouched.
    pub fn close(&mut self) {
        if self.state == SectionState::Open {
            self.state = SectionState::Closed;
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == SectionState::Open
    }

    pub fn is_closed(&self) -> bool {
        self.state == SectionState::Closed
    }
}

/// Index of a [`Layer`] in [`Board::layers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerId(pub usize);

/// Index of a [`Net`] in [`Board::nets`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetId(pub usize);

/// A layer reference as written in the file, resolved against the layer
/// table if possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerRef {
    Resolved(LayerId),
    /// The canonical name as written, kept when no declared layer matches
    /// (wildcard groups like `*.Mask`, or a declare-before-use violation).
    Unresolved(String),
}

impl LayerRef {
    pub fn resolve(board: &Board, name: &str) -> Self {
        match board.find_layer(name) {
            Some(id) => LayerRef::Resolved(id),
            None => LayerRef::Unresolved(name.to_string()),
        }
    }

    pub fn id(&self) -> Option<LayerId> {
        match self {
            LayerRef::Resolved(id) => Some(*id),
            LayerRef::Unresolved(_) => None,
        }
    }
}

/// A net reference by ordinal, resolved against the net list if possible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NetRef {
    Resolved(NetId),
    Unresolved(i32),
}

impl NetRef {
    pub fn resolve(board: &Board, ordinal: i32) -> Self {
        match board.find_net(ordinal) {
            Some(id) => NetRef::Resolved(id),
            None => NetRef::Unresolved(ordinal),
        }
    }

    pub fn id(&self) -> Option<NetId> {
        match self {
            NetRef::Resolved(id) => Some(*id),
            NetRef::Unresolved(_) => None,
        }
    }
}

/// File header: format version and the tool that wrote the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub version: String,
    pub generator: String,
    pub generator_version: String,
    pub index: SectionIndex,
}

/// The `general` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct General {
    pub thickness: f64, // board thickness in mm
    pub legacy_teardrops: bool,
    pub index: SectionIndex,
}

/// The `paper` declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub paper: String, // e.g. "A4"
    pub index: SectionIndex,
}

/// The `setup` section. The stackup subsection writes into the layer
/// table, so only its lifecycle is tracked here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Setup {
    pub pad_to_mask_clearance: f64,
    pub solder_mask_min_width: f64,
    pub pad_to_paste_clearance: f64,
    pub pad_to_paste_clearance_ratio: f64,
    pub stackup: SectionIndex,
    pub index: SectionIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerType {
    Jumper,
    Mixed,
    Power,
    Signal,
    User,
}

impl Default for LayerType {
    fn default() -> Self {
        LayerType::Signal
    }
}

/// Physical stackup data attached to a layer by the `setup`/`stackup`
/// subsection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackupInfo {
    pub material: Option<String>,
    pub thickness: Option<f64>,    // mm
    pub epsilon_r: Option<f64>,    // relative permittivity
    pub loss_tangent: Option<f64>,
}

/// One entry of the layer table, possibly extended with stackup data. A
/// `dielectric N` stackup spacer that names no declared layer is stored as
/// a synthetic layer with ordinal -1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub ordinal: i32,
    pub canonical_name: String, // e.g. "F.Cu"
    pub user_name: Option<String>,
    pub layer_type: LayerType,
    pub stackup: Option<StackupInfo>,
    pub index: SectionIndex,
}

/// A net declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Net {
    pub ordinal: i32,
    pub name: String,
    pub index: SectionIndex,
}

/// Placement of an entity: position plus rotation angle in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

/// A bare coordinate pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

/// A coordinate triple used by 3-D model transforms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A placed component: properties, outline graphics, pads and an optional
/// 3-D model, all in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub library_link: String, // e.g. "Resistor_SMD:R_0603_1608Metric"
    pub layer: Option<LayerRef>,
    pub at: Placement,
    pub description: String,
    pub uuid: String,
    pub properties: Vec<FootprintProperty>,
    pub lines: Vec<OutlineLine>,
    pub pads: Vec<Pad>,
    pub model: Option<Model3d>,
    pub index: SectionIndex,
}

/// A key/value property of a footprint ("Reference", "Value", ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootprintProperty {
    pub key: String,
    pub value: String,
    pub at: Placement,
    pub layer: Option<LayerRef>,
    pub uuid: String,
    pub index: SectionIndex,
}

/// A silkscreen/courtyard graphic line of a footprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlineLine {
    pub start: Point,
    pub end: Point,
    pub width: f64, // stroke width in mm
    pub layer: Option<LayerRef>,
    pub uuid: String,
    pub index: SectionIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadType {
    ThruHole,
    Smd,
    Connect,
    NpThruHole, // non-plated through hole
}

impl Default for PadType {
    fn default() -> Self {
        PadType::Smd
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PadShape {
    Circle,
    Rect,
    Oval,
    Trapezoid,
    RoundRect,
}

impl Default for PadShape {
    fn default() -> Self {
        PadShape::Circle
    }
}

/// A copper/solder pad of a footprint. `layers` has one slot per token of
/// the declaration's `layers` child, resolved where possible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub number: String,
    pub pad_type: PadType,
    pub shape: PadShape,
    pub at: Placement,
    pub size: Size2D,
    pub drill: Option<f64>, // hole diameter in mm
    pub layers: Vec<LayerRef>,
    pub net: Option<NetRef>,
    pub uuid: String,
    pub index: SectionIndex,
}

/// A vertical interconnect between copper layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub at: Point,
    pub size: f64,  // pad diameter in mm
    pub drill: f64, // hole diameter in mm
    pub layers: Vec<LayerRef>,
    pub net: Option<NetRef>,
    pub uuid: String,
    pub index: SectionIndex,
}

/// A straight copper trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub width: f64,
    pub layer: Option<LayerRef>,
    pub net: Option<NetRef>,
    pub uuid: String,
    pub index: SectionIndex,
}

/// A curved copper trace through a mid point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub start: Point,
    pub mid: Point,
    pub end: Point,
    pub width: f64,
    pub layer: Option<LayerRef>,
    pub net: Option<NetRef>,
    pub uuid: String,
    pub index: SectionIndex,
}

/// One copper connection primitive, in board declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Track {
    Via(Via),
    Segment(Segment),
    Arc(Arc),
}

impl Track {
    pub fn net(&self) -> Option<NetRef> {
        match self {
            Track::Via(v) => v.net,
            Track::Segment(s) => s.net,
            Track::Arc(a) => a.net,
        }
    }

    pub fn index(&self) -> &SectionIndex {
        match self {
            Track::Via(v) => &v.index,
            Track::Segment(s) => &s.index,
            Track::Arc(a) => &a.index,
        }
    }
}

/// A copper pour: boundary polygon plus the filled result, with points in
/// file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub net: Option<NetRef>,
    pub net_name: String,
    pub layer: Option<LayerRef>,
    pub priority: u32,
    pub polygon: Vec<Point>,
    pub filled_polygon: Vec<Point>,
    pub uuid: String,
    pub index: SectionIndex,
}

/// Reference to a 3-D model file with its placement transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model3d {
    pub path: String,
    pub offset: Xyz,
    pub scale: Xyz,
    pub rotate: Xyz,
    pub index: SectionIndex,
}

impl Default for Model3d {
    fn default() -> Self {
        Self {
            path: String::new(),
            offset: Xyz::default(),
            scale: Xyz { x: 1.0, y: 1.0, z: 1.0 },
            rotate: Xyz::default(),
            index: SectionIndex::default(),
        }
    }
}

/// The complete parsed design. Built in a single left-to-right pass;
/// every collection keeps declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub header: Header,
    pub general: General,
    pub page: Page,
    pub setup: Setup,
    pub layers: Vec<Layer>,
    /// Lifecycle of the `layers` table group.
    pub layer_table: SectionIndex,
    pub nets: Vec<Net>,
    pub footprints: Vec<Footprint>,
    pub tracks: Vec<Track>,
    pub zones: Vec<Zone>,
    /// Lifecycle of the outermost `kicad_pcb` group.
    pub root: SectionIndex,
}

impl Board {
    /// Look up a layer by canonical name: linear scan, first exact match.
    pub fn find_layer(&self, canonical_name: &str) -> Option<LayerId> {
        self.layers
            .iter()
            .position(|layer| layer.canonical_name == canonical_name)
            .map(LayerId)
    }

    /// Look up a net by ordinal: linear scan, first exact match.
    pub fn find_net(&self, ordinal: i32) -> Option<NetId> {
        self.nets
            .iter()
            .position(|net| net.ordinal == ordinal)
            .map(NetId)
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.0)
    }

    pub fn net(&self, id: NetId) -> Option<&Net> {
        self.nets.get(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_index_never_regresses() {
        let mut index = SectionIndex::default();
        assert_eq!(index.state, SectionState::Unset);

        index.open(Span { start: 3, end: 9 });
        assert_eq!(index.state, SectionState::Open);
        assert_eq!(index.span, Span { start: 3, end: 9 });

        // A second open must not clobber the recorded extent.
        index.open(Span { start: 100, end: 200 });
        assert_eq!(index.span, Span { start: 3, end: 9 });

        index.close();
        assert!(index.is_closed());

        index.open(Span { start: 0, end: 1 });
        index.close();
        assert!(index.is_closed());
        assert_eq!(index.span, Span { start: 3, end: 9 });
    }

    #[test]
    fn close_without_open_is_ignored() {
        let mut index = SectionIndex::default();
        index.close();
        assert_eq!(index.state, SectionState::Unset);
    }

    #[test]
    fn find_layer_and_net_scan_in_declaration_order() {
        let mut board = Board::default();
        board.layers.push(Layer {
            ordinal: 0,
            canonical_name: "F.Cu".into(),
            ..Default::default()
        });
        board.layers.push(Layer {
            ordinal: 31,
            canonical_name: "B.Cu".into(),
            ..Default::default()
        });
        board.nets.push(Net {
            ordinal: 0,
            name: "".into(),
            ..Default::default()
        });
        board.nets.push(Net {
            ordinal: 2,
            name: "GND".into(),
            ..Default::default()
        });

        assert_eq!(board.find_layer("B.Cu"), Some(LayerId(1)));
        assert_eq!(board.find_layer("In1.Cu"), None);
        assert_eq!(board.find_net(2), Some(NetId(1)));
        assert_eq!(board.find_net(5), None);

        let id = board.find_net(2).unwrap();
        assert_eq!(board.net(id).unwrap().name, "GND");
    }

    #[test]
    fn unresolved_refs_keep_what_was_written() {
        let board = Board::default();
        let layer = LayerRef::resolve(&board, "F.Mask");
        assert_eq!(layer, LayerRef::Unresolved("F.Mask".into()));
        assert_eq!(layer.id(), None);

        let net = NetRef::resolve(&board, 5);
        assert_eq!(net, NetRef::Unresolved(5));
        assert_eq!(net.id(), None);
    }
}
