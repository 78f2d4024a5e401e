//! Section parsers building the [`Board`] model from the s-expression tree.
//!
//! One method per section. Each section owns the keyword match for its own
//! children, so an overloaded keyword (`net`, `layer`, `at`, `uuid`, the
//! model transforms) is always read with the meaning of the innermost
//! section being parsed: `net` at board level declares a net, `net` inside
//! a pad or track resolves one. Keywords with no meaning in the current
//! section are ignored without touching the model.

use std::path::Path;

use thiserror::Error;

use crate::parser::schema::*;
use crate::parser::sexp::{SExp, SExpReader};

#[derive(Debug, Error)]
pub enum BoardFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parser facade for `.kicad_pcb` input.
pub struct BoardParser;

impl BoardParser {
    /// Parse board file contents. Best effort: malformed groups, unknown
    /// keywords and unresolvable references are reported via `tracing`
    /// and skipped; the result is always a usable [`Board`].
    pub fn parse_str(input: &str) -> Board {
        let mut builder = BoardBuilder::default();
        if let Some(root) = SExpReader::new(input).parse() {
            builder.walk_root(&root);
        }
        builder.board
    }

    /// Read and parse a board file. I/O failure is the only fatal error.
    pub fn parse_file(path: &Path) -> Result<Board, BoardFileError> {
        let input = std::fs::read_to_string(path)?;
        Ok(Self::parse_str(&input))
    }
}

#[derive(Default)]
struct BoardBuilder {
    board: Board,
}

impl BoardBuilder {
    fn walk_root(&mut self, root: &SExp) {
        if root.tag() != Some("kicad_pcb") {
            tracing::warn!("root group is {:?}, not kicad_pcb", root.tag());
            return;
        }
        let span = root.span().unwrap_or_default();
        self.board.root.open(span);
        // The header has no group of its own: it is the run of scalar
        // fields at the start of the root group.
        self.board.header.index.open(span);

        let items = root.as_list().unwrap_or_default();
        for item in items.iter().skip(1) {
            let Some(tag) = item.tag() else { continue };
            if matches!(tag, "version" | "generator" | "generator_version") {
                self.header_field(tag, item);
                continue;
            }
            // Any structural section ends the header, even when the file
            // never declared a generator_version.
            self.board.header.index.close();
            match tag {
                "general" => self.parse_general(item),
                "paper" => self.parse_paper(item),
                "layers" => self.parse_layer_table(item),
                "setup" => self.parse_setup(item),
                "net" => self.parse_net_decl(item),
                "footprint" => self.parse_footprint(item),
                "via" => self.parse_via(item),
                "segment" => self.parse_segment(item),
                "arc" => self.parse_arc(item),
                "zone" => self.parse_zone(item),
                other => tracing::debug!("ignoring board-level group {other:?}"),
            }
        }

        self.board.header.index.close();
        self.board.root.close();
    }

    /// `version`, `generator` and `generator_version` only mean anything
    /// while the header is still open; `generator_version` is the last
    /// header field, so it closes the header.
    fn header_field(&mut self, tag: &str, item: &SExp) {
        if !self.board.header.index.is_open() {
            tracing::debug!("ignoring {tag} outside the file header");
            return;
        }
        let value = item.arg(0).unwrap_or_default().to_string();
        match tag {
            "version" => self.board.header.version = value,
            "generator" => self.board.header.generator = value,
            _ => {
                self.board.header.generator_version = value;
                self.board.header.index.close();
            }
        }
    }

    fn parse_general(&mut self, sexp: &SExp) {
        if self.board.general.index.is_closed() {
            tracing::debug!("ignoring duplicate general section");
            return;
        }
        self.board.general.index.open(sexp.span().unwrap_or_default());
        for child in sexp.as_list().unwrap_or_default().iter().skip(1) {
            match child.tag() {
                Some("thickness") => {
                    self.board.general.thickness = num(child.arg(0), "board thickness");
                }
                Some("legacy_teardrops") => {
                    self.board.general.legacy_teardrops = child.arg(0) == Some("yes");
                }
                Some(other) => tracing::debug!("ignoring {other:?} in general"),
                None => {}
            }
        }
        self.board.general.index.close();
    }

    fn parse_paper(&mut self, sexp: &SExp) {
        if self.board.page.index.is_closed() {
            tracing::debug!("ignoring duplicate paper declaration");
            return;
        }
        self.board.page.index.open(sexp.span().unwrap_or_default());
        self.board.page.paper = sexp.arg(0).unwrap_or_default().to_string();
        self.board.page.index.close();
    }

    /// The layer table: every child group is one layer definition of the
    /// form `(ordinal "Canonical.Name" type ["user name"])`.
    fn parse_layer_table(&mut self, sexp: &SExp) {
        if self.board.layer_table.is_closed() {
            tracing::debug!("ignoring duplicate layers table");
            return;
        }
        self.board.layer_table.open(sexp.span().unwrap_or_default());
        for child in sexp.as_list().unwrap_or_default().iter().skip(1) {
            if child.as_list().is_some() {
                self.parse_layer_def(child);
            }
        }
        self.board.layer_table.close();
    }

    fn parse_layer_def(&mut self, sexp: &SExp) {
        let items = sexp.as_list().unwrap_or_default();
        let mut layer = Layer {
            ordinal: int(items.first().and_then(SExp::as_atom), "layer ordinal"),
            canonical_name: items
                .get(1)
                .and_then(SExp::as_atom)
                .unwrap_or_default()
                .to_string(),
            user_name: items.get(3).and_then(SExp::as_atom).map(str::to_string),
            layer_type: match items.get(2).and_then(SExp::as_atom) {
                Some("jumper") => LayerType::Jumper,
                Some("mixed") => LayerType::Mixed,
                Some("power") => LayerType::Power,
                Some("signal") => LayerType::Signal,
                _ => LayerType::User,
            },
            stackup: None,
            index: SectionIndex::default(),
        };
        layer.index.open(sexp.span().unwrap_or_default());
        layer.index.close();
        self.board.layers.push(layer);
    }

    fn parse_setup(&mut self, sexp: &SExp) {
        if self.board.setup.index.is_closed() {
            tracing::debug!("ignoring duplicate setup section");
            return;
        }
        self.board.setup.index.open(sexp.span().unwrap_or_default());
        for child in sexp.as_list().unwrap_or_default().iter().skip(1) {
            match child.tag() {
                Some("pad_to_mask_clearance") => {
                    self.board.setup.pad_to_mask_clearance =
                        num(child.arg(0), "pad_to_mask_clearance");
                }
                Some("solder_mask_min_width") => {
                    self.board.setup.solder_mask_min_width =
                        num(child.arg(0), "solder_mask_min_width");
                }
                Some("pad_to_paste_clearance") => {
                    self.board.setup.pad_to_paste_clearance =
                        num(child.arg(0), "pad_to_paste_clearance");
                }
                Some("pad_to_paste_clearance_ratio") => {
                    self.board.setup.pad_to_paste_clearance_ratio =
                        num(child.arg(0), "pad_to_paste_clearance_ratio");
                }
                Some("stackup") => self.parse_stackup(child),
                Some("pcbplotparams") => {
                    tracing::debug!("ignoring plot parameters");
                }
                Some(other) => tracing::debug!("ignoring {other:?} in setup"),
                None => {}
            }
        }
        self.board.setup.index.close();
    }

    fn parse_stackup(&mut self, sexp: &SExp) {
        if self.board.setup.stackup.is_closed() {
            tracing::debug!("ignoring duplicate stackup subsection");
            return;
        }
        self.board.setup.stackup.open(sexp.span().unwrap_or_default());
        for entry in sexp.get_all("layer") {
            self.parse_stackup_layer(entry);
        }
        self.board.setup.stackup.close();
    }

    /// A stackup `layer` entry extends the declared layer it names. A name
    /// that resolves to nothing creates a synthetic layer only when it
    /// matches the `dielectric N` spacer pattern; anything else is dropped.
    fn parse_stackup_layer(&mut self, entry: &SExp) {
        let Some(name) = entry.arg(0) else {
            tracing::warn!("stackup layer entry without a name");
            return;
        };
        let id = match self.board.find_layer(name) {
            Some(id) => id,
            None => {
                if !is_dielectric_name(name) {
                    tracing::warn!("stackup entry {name:?} names no declared layer");
                    return;
                }
                let mut layer = Layer {
                    ordinal: -1,
                    canonical_name: name.to_string(),
                    layer_type: LayerType::User,
                    ..Default::default()
                };
                layer.index.open(entry.span().unwrap_or_default());
                layer.index.close();
                self.board.layers.push(layer);
                LayerId(self.board.layers.len() - 1)
            }
        };
        let info = StackupInfo {
            material: entry.value_of("material").map(str::to_string),
            thickness: opt_num(entry, "thickness", "stackup thickness"),
            epsilon_r: opt_num(entry, "epsilon_r", "stackup epsilon_r"),
            loss_tangent: opt_num(entry, "loss_tangent", "stackup loss_tangent"),
        };
        if let Some(layer) = self.board.layers.get_mut(id.0) {
            layer.stackup = Some(info);
        }
    }

    /// A board-level `net` group declares a net; `net` groups inside pads,
    /// tracks and zones are resolved by `net_ref` instead.
    fn parse_net_decl(&mut self, sexp: &SExp) {
        let mut net = Net {
            ordinal: int(sexp.arg(0), "net ordinal"),
            name: sexp.arg(1).unwrap_or_default().to_string(),
            index: SectionIndex::default(),
        };
        net.index.open(sexp.span().unwrap_or_default());
        net.index.close();
        self.board.nets.push(net);
    }

    fn parse_footprint(&mut self, sexp: &SExp) {
        let mut footprint = Footprint {
            library_link: sexp.arg(0).unwrap_or_default().to_string(),
            ..Default::default()
        };
        footprint.index.open(sexp.span().unwrap_or_default());
        for child in sexp.as_list().unwrap_or_default().iter().skip(1) {
            match child.tag() {
                Some("layer") => {
                    footprint.layer = child
                        .arg(0)
                        .map(|name| LayerRef::resolve(&self.board, name));
                }
                Some("at") => footprint.at = placement(child, "footprint position"),
                Some("descr") => {
                    footprint.description = child.arg(0).unwrap_or_default().to_string();
                }
                Some("uuid") => footprint.uuid = child.arg(0).unwrap_or_default().to_string(),
                Some("property") => {
                    if let Some(property) = self.parse_property(child) {
                        footprint.properties.push(property);
                    }
                }
                Some("fp_line") => {
                    let line = self.parse_fp_line(child);
                    footprint.lines.push(line);
                }
                Some("pad") => {
                    let pad = self.parse_pad(child);
                    footprint.pads.push(pad);
                }
                Some("model") => footprint.model = Some(self.parse_model(child)),
                Some(other) => tracing::debug!("ignoring {other:?} in footprint"),
                None => {}
            }
        }
        footprint.index.close();
        self.board.footprints.push(footprint);
    }

    fn parse_property(&mut self, sexp: &SExp) -> Option<FootprintProperty> {
        let Some(key) = sexp.arg(0) else {
            tracing::warn!("footprint property without a key");
            return None;
        };
        let mut property = FootprintProperty {
            key: key.to_string(),
            value: sexp.arg(1).unwrap_or_default().to_string(),
            ..Default::default()
        };
        property.index.open(sexp.span().unwrap_or_default());
        for child in sexp.as_list().unwrap_or_default().iter().skip(1) {
            match child.tag() {
                Some("at") => property.at = placement(child, "property position"),
                Some("layer") => {
                    property.layer = child
                        .arg(0)
                        .map(|name| LayerRef::resolve(&self.board, name));
                }
                Some("uuid") => property.uuid = child.arg(0).unwrap_or_default().to_string(),
                Some(other) => tracing::debug!("ignoring {other:?} in property"),
                None => {}
            }
        }
        property.index.close();
        Some(property)
    }

    fn parse_fp_line(&mut self, sexp: &SExp) -> OutlineLine {
        let mut line = OutlineLine {
            start: point_of(sexp.get("start"), "fp_line start"),
            end: point_of(sexp.get("end"), "fp_line end"),
            width: sexp
                .get("stroke")
                .and_then(|stroke| stroke.get("width"))
                .map_or(0.0, |width| num(width.arg(0), "fp_line width")),
            layer: sexp
                .value_of("layer")
                .map(|name| LayerRef::resolve(&self.board, name)),
            uuid: sexp.value_of("uuid").unwrap_or_default().to_string(),
            index: SectionIndex::default(),
        };
        line.index.open(sexp.span().unwrap_or_default());
        line.index.close();
        line
    }

    fn parse_pad(&mut self, sexp: &SExp) -> Pad {
        let mut pad = Pad {
            number: sexp.arg(0).unwrap_or_default().to_string(),
            pad_type: match sexp.arg(1) {
                Some("thru_hole") => PadType::ThruHole,
                Some("smd") => PadType::Smd,
                Some("connect") => PadType::Connect,
                Some("np_thru_hole") => PadType::NpThruHole,
                other => {
                    tracing::warn!("unknown pad type {other:?}, assuming smd");
                    PadType::Smd
                }
            },
            shape: match sexp.arg(2) {
                Some("circle") => PadShape::Circle,
                Some("rect") => PadShape::Rect,
                Some("oval") => PadShape::Oval,
                Some("trapezoid") => PadShape::Trapezoid,
                Some("roundrect") => PadShape::RoundRect,
                other => {
                    tracing::warn!("unknown pad shape {other:?}, assuming circle");
                    PadShape::Circle
                }
            },
            ..Default::default()
        };
        pad.index.open(sexp.span().unwrap_or_default());
        for child in sexp.as_list().unwrap_or_default().iter().skip(1) {
            match child.tag() {
                Some("at") => pad.at = placement(child, "pad position"),
                Some("size") => {
                    pad.size = Size2D {
                        width: num(child.arg(0), "pad size"),
                        height: num(child.arg(1), "pad size"),
                    };
                }
                Some("drill") => pad.drill = Some(num(child.arg(0), "pad drill")),
                Some("layers") => pad.layers = self.layer_refs(child),
                Some("net") => pad.net = self.net_ref(child),
                Some("uuid") => pad.uuid = child.arg(0).unwrap_or_default().to_string(),
                Some(other) => tracing::debug!("ignoring {other:?} in pad"),
                None => {}
            }
        }
        pad.index.close();
        pad
    }

    fn parse_model(&mut self, sexp: &SExp) -> Model3d {
        let mut model = Model3d {
            path: sexp.arg(0).unwrap_or_default().to_string(),
            ..Default::default()
        };
        model.index.open(sexp.span().unwrap_or_default());
        if let Some(xyz) = sexp.get("offset").and_then(|o| o.get("xyz")) {
            model.offset = xyz_of(xyz, "model offset");
        }
        if let Some(xyz) = sexp.get("scale").and_then(|s| s.get("xyz")) {
            model.scale = xyz_of(xyz, "model scale");
        }
        if let Some(xyz) = sexp.get("rotate").and_then(|r| r.get("xyz")) {
            model.rotate = xyz_of(xyz, "model rotate");
        }
        model.index.close();
        model
    }

    fn parse_via(&mut self, sexp: &SExp) {
        let mut via = Via {
            size: sexp.get("size").map_or(0.0, |s| num(s.arg(0), "via size")),
            drill: sexp.get("drill").map_or(0.0, |d| num(d.arg(0), "via drill")),
            ..Default::default()
        };
        via.index.open(sexp.span().unwrap_or_default());
        if let Some(at) = sexp.get("at") {
            via.at = Point {
                x: num(at.arg(0), "via position"),
                y: num(at.arg(1), "via position"),
            };
        }
        if let Some(layers) = sexp.get("layers") {
            via.layers = self.layer_refs(layers);
        }
        via.net = sexp.get("net").and_then(|net| self.net_ref(net));
        via.uuid = sexp.value_of("uuid").unwrap_or_default().to_string();
        via.index.close();
        self.board.tracks.push(Track::Via(via));
    }

    fn parse_segment(&mut self, sexp: &SExp) {
        let mut segment = Segment {
            start: point_of(sexp.get("start"), "segment start"),
            end: point_of(sexp.get("end"), "segment end"),
            width: sexp
                .get("width")
                .map_or(0.0, |w| num(w.arg(0), "segment width")),
            layer: sexp
                .value_of("layer")
                .map(|name| LayerRef::resolve(&self.board, name)),
            ..Default::default()
        };
        segment.index.open(sexp.span().unwrap_or_default());
        segment.net = sexp.get("net").and_then(|net| self.net_ref(net));
        segment.uuid = sexp.value_of("uuid").unwrap_or_default().to_string();
        segment.index.close();
        self.board.tracks.push(Track::Segment(segment));
    }

    fn parse_arc(&mut self, sexp: &SExp) {
        let mut arc = Arc {
            start: point_of(sexp.get("start"), "arc start"),
            mid: point_of(sexp.get("mid"), "arc mid"),
            end: point_of(sexp.get("end"), "arc end"),
            width: sexp.get("width").map_or(0.0, |w| num(w.arg(0), "arc width")),
            layer: sexp
                .value_of("layer")
                .map(|name| LayerRef::resolve(&self.board, name)),
            ..Default::default()
        };
        arc.index.open(sexp.span().unwrap_or_default());
        arc.net = sexp.get("net").and_then(|net| self.net_ref(net));
        arc.uuid = sexp.value_of("uuid").unwrap_or_default().to_string();
        arc.index.close();
        self.board.tracks.push(Track::Arc(arc));
    }

    fn parse_zone(&mut self, sexp: &SExp) {
        let mut zone = Zone {
            net_name: sexp.value_of("net_name").unwrap_or_default().to_string(),
            layer: sexp
                .value_of("layer")
                .map(|name| LayerRef::resolve(&self.board, name)),
            priority: sexp
                .get("priority")
                .map_or(0, |p| uint(p.arg(0), "zone priority")),
            uuid: sexp.value_of("uuid").unwrap_or_default().to_string(),
            ..Default::default()
        };
        zone.index.open(sexp.span().unwrap_or_default());
        zone.net = sexp.get("net").and_then(|net| self.net_ref(net));
        if let Some(pts) = sexp.get("polygon").and_then(|poly| poly.get("pts")) {
            zone.polygon = points_of(pts);
        }
        for filled in sexp.get_all("filled_polygon") {
            if let Some(pts) = filled.get("pts") {
                zone.filled_polygon.extend(points_of(pts));
            }
        }
        zone.index.close();
        self.board.zones.push(zone);
    }

    /// One slot per token of a `layers` group, resolved where possible.
    fn layer_refs(&self, sexp: &SExp) -> Vec<LayerRef> {
        sexp.as_list()
            .unwrap_or_default()
            .iter()
            .skip(1)
            .filter_map(SExp::as_atom)
            .map(|name| LayerRef::resolve(&self.board, name))
            .collect()
    }

    /// Resolve a `(net N ["name"])` reference against the declared nets.
    fn net_ref(&self, sexp: &SExp) -> Option<NetRef> {
        let Some(ordinal) = sexp.arg(0) else {
            tracing::warn!("net reference without an ordinal");
            return None;
        };
        Some(NetRef::resolve(&self.board, int(Some(ordinal), "net ordinal")))
    }
}

/// Parse a numeric field; a failure is advisory and yields zero.
fn num(value: Option<&str>, what: &str) -> f64 {
    match value {
        Some(text) => match text.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!("invalid number {text:?} for {what}, using 0");
                0.0
            }
        },
        None => {
            tracing::debug!("missing value for {what}, using 0");
            0.0
        }
    }
}

fn int(value: Option<&str>, what: &str) -> i32 {
    match value {
        Some(text) => match text.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!("invalid integer {text:?} for {what}, using 0");
                0
            }
        },
        None => {
            tracing::debug!("missing value for {what}, using 0");
            0
        }
    }
}

fn uint(value: Option<&str>, what: &str) -> u32 {
    match value {
        Some(text) => match text.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                tracing::warn!("invalid integer {text:?} for {what}, using 0");
                0
            }
        },
        None => 0,
    }
}

fn opt_num(sexp: &SExp, key: &str, what: &str) -> Option<f64> {
    sexp.get(key).map(|child| num(child.arg(0), what))
}

fn placement(sexp: &SExp, what: &str) -> Placement {
    Placement {
        x: num(sexp.arg(0), what),
        y: num(sexp.arg(1), what),
        angle: sexp.arg(2).map_or(0.0, |text| num(Some(text), what)),
    }
}

fn point_of(sexp: Option<&SExp>, what: &str) -> Point {
    match sexp {
        Some(pair) => Point {
            x: num(pair.arg(0), what),
            y: num(pair.arg(1), what),
        },
        None => {
            tracing::debug!("missing {what}, using origin");
            Point::default()
        }
    }
}

fn xyz_of(sexp: &SExp, what: &str) -> Xyz {
    Xyz {
        x: num(sexp.arg(0), what),
        y: num(sexp.arg(1), what),
        z: num(sexp.arg(2), what),
    }
}

/// Collect the points of a `pts` group. The array is sized from a count
/// of the `xy` children before any point is read.
fn points_of(pts: &SExp) -> Vec<Point> {
    let count = pts.get_all("xy").count();
    let mut points = Vec::with_capacity(count);
    for xy in pts.get_all("xy") {
        points.push(Point {
            x: num(xy.arg(0), "polygon point"),
            y: num(xy.arg(1), "polygon point"),
        });
    }
    points
}

/// Stackup spacer names look like `dielectric 1`, `dielectric 2`, ...
fn is_dielectric_name(name: &str) -> bool {
    name.strip_prefix("dielectric ")
        .map_or(false, |rest| {
            !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stackup_extends_declared_layer() {
        let board = BoardParser::parse_str(
            r#"(kicad_pcb
                (layers (0 "F.Cu" signal))
                (setup (stackup
                    (layer "F.Cu" (type "copper") (thickness 0.035) (material "FR4")
                        (epsilon_r 4.5) (loss_tangent 0.02))))
            )"#,
        );
        assert_eq!(board.layers.len(), 1);
        let stackup = board.layers[0].stackup.as_ref().unwrap();
        assert_eq!(stackup.material.as_deref(), Some("FR4"));
        assert_eq!(stackup.thickness, Some(0.035));
        assert_eq!(stackup.epsilon_r, Some(4.5));
        assert_eq!(stackup.loss_tangent, Some(0.02));
    }

    #[test]
    fn stackup_synthesizes_dielectric_spacer() {
        let board = BoardParser::parse_str(
            r#"(kicad_pcb
                (layers (0 "F.Cu" signal) (31 "B.Cu" signal))
                (setup (stackup
                    (layer "dielectric 1" (type "core") (thickness 1.51) (material "FR4"))))
            )"#,
        );
        assert_eq!(board.layers.len(), 3);
        let id = board.find_layer("dielectric 1").unwrap();
        let layer = board.layer(id).unwrap();
        assert_eq!(layer.ordinal, -1);
        assert_eq!(layer.layer_type, LayerType::User);
        assert_eq!(layer.stackup.as_ref().unwrap().thickness, Some(1.51));
    }

    #[test]
    fn stackup_drops_unknown_non_dielectric_entry() {
        let board = BoardParser::parse_str(
            r#"(kicad_pcb
                (layers (0 "F.Cu" signal))
                (setup (stackup (layer "F.SilkS" (thickness 0.01))))
            )"#,
        );
        assert_eq!(board.layers.len(), 1);
        assert!(board.layers[0].stackup.is_none());
    }

    #[test]
    fn net_keyword_declares_at_board_level_and_resolves_in_pads() {
        let board = BoardParser::parse_str(
            r#"(kicad_pcb
                (layers (0 "F.Cu" signal))
                (net 0 "")
                (net 1 "VCC")
                (footprint "Lib:R"
                    (pad "1" smd rect (at 0 0) (size 1 1) (layers "F.Cu") (net 1 "VCC")))
            )"#,
        );
        assert_eq!(board.nets.len(), 2);
        let pad = &board.footprints[0].pads[0];
        let net_id = pad.net.unwrap().id().unwrap();
        assert_eq!(board.net(net_id).unwrap().name, "VCC");
    }

    #[test]
    fn numeric_failure_defaults_to_zero() {
        let board = BoardParser::parse_str(
            r#"(kicad_pcb (general (thickness not-a-number) (legacy_teardrops no)))"#,
        );
        assert_eq!(board.general.thickness, 0.0);
        assert!(!board.general.legacy_teardrops);
    }

    #[test]
    fn pad_layers_have_one_slot_per_token() {
        let board = BoardParser::parse_str(
            r#"(kicad_pcb
                (layers (0 "F.Cu" signal) (31 "B.Cu" signal))
                (footprint "Lib:J"
                    (pad "1" thru_hole circle (at 0 0) (size 1.7 1.7) (drill 1)
                        (layers "F.Cu" "*.Mask" "B.Cu")))
            )"#,
        );
        let pad = &board.footprints[0].pads[0];
        assert_eq!(pad.layers.len(), 3);
        assert!(matches!(pad.layers[0], LayerRef::Resolved(_)));
        assert_eq!(pad.layers[1], LayerRef::Unresolved("*.Mask".into()));
        assert!(matches!(pad.layers[2], LayerRef::Resolved(_)));
        assert_eq!(pad.drill, Some(1.0));
    }

    #[test]
    fn header_fields_are_ignored_after_the_header_closes() {
        let board = BoardParser::parse_str(
            r#"(kicad_pcb
                (version 20221018)
                (generator "pcbnew")
                (general (thickness 1.6))
                (version 99999999)
            )"#,
        );
        assert_eq!(board.header.version, "20221018");
        assert!(board.header.index.is_closed());
    }

    #[test]
    fn duplicate_sections_are_ignored() {
        let board = BoardParser::parse_str(
            r#"(kicad_pcb
                (general (thickness 1.6))
                (general (thickness 3.2))
                (layers (0 "F.Cu" signal))
                (layers (31 "B.Cu" signal))
            )"#,
        );
        assert_eq!(board.general.thickness, 1.6);
        assert_eq!(board.layers.len(), 1);
        assert_eq!(board.layers[0].canonical_name, "F.Cu");
    }

    #[test]
    fn model_transforms_with_defaults() {
        let board = BoardParser::parse_str(
            r#"(kicad_pcb
                (footprint "Lib:R"
                    (model "${KICAD}/R_0603.step"
                        (offset (xyz 0.1 0.2 0.3))
                        (rotate (xyz 0 0 90))))
            )"#,
        );
        let model = board.footprints[0].model.as_ref().unwrap();
        assert_eq!(model.path, "${KICAD}/R_0603.step");
        assert_eq!(model.offset, Xyz { x: 0.1, y: 0.2, z: 0.3 });
        assert_eq!(model.scale, Xyz { x: 1.0, y: 1.0, z: 1.0 });
        assert_eq!(model.rotate, Xyz { x: 0.0, y: 0.0, z: 90.0 });
    }

    #[test]
    fn non_board_root_yields_empty_board() {
        let board = BoardParser::parse_str(r#"(kicad_sch (version 1))"#);
        assert_eq!(board, Board::default());
        assert_eq!(BoardParser::parse_str(""), Board::default());
    }
}
