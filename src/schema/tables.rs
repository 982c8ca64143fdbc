//! Tag tables per object kind, and the value maps they decode through.

use super::{Decode, Handler, TagSpec, ValueMap};
use crate::object::ButtonState;

use Decode::{Color, DWord, SWord, Word};

// ============================================================================
// Value maps
// ============================================================================

pub const LAYOUTS: &ValueMap = &[(0x41, "TbRl"), (0x34, "LrTb")];

pub const PAGE_POSITIONS: &ValueMap = &[(0, "any"), (1, "upper"), (2, "lower")];

pub const EMPTY_VIEWS: &ValueMap = &[(1, "show"), (0, "empty")];

pub const WAIT_PROPS: &ValueMap = &[(1, "replay"), (2, "noreplay")];

pub const BLOCK_RULES: &ValueMap = &[
    (0x14, "horz-fixed"),
    (0x12, "horz-adjustable"),
    (0x41, "vert-fixed"),
    (0x21, "vert-adjustable"),
    (0x44, "block-fixed"),
    (0x22, "block-adjustable"),
];

pub const CANVAS_RULES: &ValueMap = &[(0x44, "block-fixed"), (0x22, "block-adjustable")];

pub const FRAME_MODES: &ValueMap = &[(0, "none"), (1, "square"), (2, "curve")];

pub const ALIGNMENTS: &ValueMap = &[(1, "head"), (4, "center"), (8, "foot")];

pub const RUBY_OVERHANG: &ValueMap = &[(0, "none"), (1, "auto")];

pub const BEFORE_AFTER: &ValueMap = &[(1, "before"), (2, "after")];

pub const LINE_TYPES: &ValueMap = &[
    (0x00, "none"),
    (0x10, "solid"),
    (0x20, "dashed"),
    (0x30, "double"),
    (0x40, "dotted"),
];

/// Ruled lines additionally use an undocumented `0x13`.
pub const RULED_LINE_TYPES: &ValueMap = &[
    (0x00, "none"),
    (0x10, "solid"),
    (0x20, "dashed"),
    (0x30, "double"),
    (0x40, "dotted"),
    (0x13, "unknown13"),
];

pub const POSITIONS: &ValueMap = &[
    (1, "bottomleft"),
    (2, "bottomright"),
    (3, "topright"),
    (4, "topleft"),
    (5, "base"),
];

pub const PLOT_ADJUSTMENTS: &ValueMap = &[(1, "top"), (2, "center"), (3, "baseline"), (4, "bottom")];

// ============================================================================
// Shared tables
// ============================================================================

pub const BASE: &[TagSpec] = &[
    TagSpec::ignore(0xF500),
    TagSpec::ignore(0xF501),
    TagSpec::handle(0xF502, Handler::InfoLink),
];

pub const STREAM: &[TagSpec] = &[
    TagSpec::handle(0xF504, Handler::StreamSize),
    TagSpec::handle(0xF554, Handler::StreamFlags),
    TagSpec::handle(0xF505, Handler::StreamBody),
    TagSpec::handle(0xF506, Handler::StreamEnd),
];

pub const PAGE_ATTR: &[TagSpec] = &[
    TagSpec::attr(0xF507, "oddheaderid", DWord),
    TagSpec::attr(0xF508, "evenheaderid", DWord),
    TagSpec::attr(0xF509, "oddfooterid", DWord),
    TagSpec::attr(0xF50A, "evenfooterid", DWord),
    TagSpec::attr(0xF521, "topmargin", Word),
    TagSpec::attr(0xF522, "headheight", Word),
    TagSpec::attr(0xF523, "headsep", Word),
    TagSpec::attr(0xF524, "oddsidemargin", Word),
    TagSpec::attr(0xF52C, "evensidemargin", Word),
    TagSpec::attr(0xF525, "textheight", Word),
    TagSpec::attr(0xF526, "textwidth", Word),
    TagSpec::attr(0xF527, "footspace", Word),
    TagSpec::attr(0xF528, "footheight", Word),
    TagSpec::attr(0xF535, "layout", Decode::Map(LAYOUTS)),
    TagSpec::attr(0xF52B, "pageposition", Decode::Map(PAGE_POSITIONS)),
    TagSpec::attr(0xF52A, "setemptyview", Decode::Map(EMPTY_VIEWS)),
    TagSpec::attr(0xF5DA, "setwaitprop", Decode::Map(WAIT_PROPS)),
    TagSpec::handle(0xF529, Handler::BgImage),
];

pub const BLOCK_ATTR: &[TagSpec] = &[
    TagSpec::attr(0xF531, "blockwidth", Word),
    TagSpec::attr(0xF532, "blockheight", Word),
    TagSpec::attr(0xF533, "blockrule", Decode::Map(BLOCK_RULES)),
    TagSpec::attr(0xF534, "bgcolor", Color),
    TagSpec::attr(0xF535, "layout", Decode::Map(LAYOUTS)),
    TagSpec::attr(0xF536, "framewidth", Word),
    TagSpec::attr(0xF537, "framecolor", Color),
    TagSpec::attr(0xF52E, "framemode", Decode::Map(FRAME_MODES)),
    TagSpec::attr(0xF538, "topskip", Word),
    TagSpec::attr(0xF539, "sidemargin", Word),
    TagSpec::attr(0xF53A, "footskip", Word),
    TagSpec::handle(0xF529, Handler::BgImage),
];

pub const TEXT_ATTR: &[TagSpec] = &[
    TagSpec::attr(0xF511, "fontsize", SWord),
    TagSpec::attr(0xF512, "fontwidth", SWord),
    TagSpec::attr(0xF513, "fontescapement", SWord),
    TagSpec::attr(0xF514, "fontorientation", SWord),
    TagSpec::attr(0xF515, "fontweight", Word),
    TagSpec::attr(0xF516, "fontfacename", Decode::String),
    TagSpec::attr(0xF517, "textcolor", Color),
    TagSpec::attr(0xF518, "textbgcolor", Color),
    TagSpec::attr(0xF519, "wordspace", SWord),
    TagSpec::attr(0xF51A, "letterspace", SWord),
    TagSpec::attr(0xF51B, "baselineskip", SWord),
    TagSpec::attr(0xF51C, "linespace", SWord),
    TagSpec::attr(0xF51D, "parindent", SWord),
    TagSpec::attr(0xF51E, "parskip", SWord),
    TagSpec::attr(0xF53C, "align", Decode::Map(ALIGNMENTS)),
    TagSpec::attr(0xF53D, "column", Word),
    TagSpec::attr(0xF53E, "columnsep", Word),
    TagSpec::attr(0xF5DD, "charspace", SWord),
    TagSpec::attr(0xF5F1, "textlinewidth", Word),
    TagSpec::attr(0xF5F2, "linecolor", Color),
];

pub const RUBY: &[TagSpec] = &[
    TagSpec::attr(0xF575, "rubyalignandadjust", Word),
    TagSpec::attr(0xF576, "rubyoverhang", Decode::Map(RUBY_OVERHANG)),
    TagSpec::attr(0xF577, "empdotsposition", Decode::Map(BEFORE_AFTER)),
    TagSpec::handle(0xF578, Handler::EmpDots),
    TagSpec::attr(0xF579, "emplineposition", Decode::Map(BEFORE_AFTER)),
    TagSpec::attr(0xF57A, "emplinetype", Decode::Map(LINE_TYPES)),
];

// ============================================================================
// Per-kind tables
// ============================================================================

pub const PAGE_FIELDS: &[TagSpec] = &[
    TagSpec::handle(0xF503, Handler::StyleId),
    TagSpec::handle(0xF50B, Handler::ObjectList),
    TagSpec::ignore(0xF571),
    TagSpec::handle(0xF57C, Handler::ParentPageTree),
];

/// `F503` as a style link, for blocks and text.
pub const LINKED_STYLE: &[TagSpec] = &[TagSpec::handle(0xF503, Handler::StyleId)];

pub const PAGE_TREE: &[TagSpec] = &[TagSpec::handle(0xF55C, Handler::PageList)];

pub const CANVAS: &[TagSpec] = &[
    TagSpec::attr(0xF551, "canvaswidth", Word),
    TagSpec::attr(0xF552, "canvasheight", Word),
    TagSpec::handle(0xF5DA, Handler::CanvasWaits),
    TagSpec::attr(0xF533, "blockrule", Decode::Map(CANVAS_RULES)),
    TagSpec::attr(0xF534, "bgcolor", Color),
    TagSpec::attr(0xF535, "layout", Decode::Map(LAYOUTS)),
    TagSpec::attr(0xF536, "framewidth", Word),
    TagSpec::attr(0xF537, "framecolor", Color),
    TagSpec::attr(0xF52E, "framemode", Decode::Map(FRAME_MODES)),
];

pub const MINI_PAGE: &[TagSpec] = &[
    TagSpec::attr(0xF541, "minipagewidth", Word),
    TagSpec::attr(0xF542, "minipageheight", Word),
];

pub const IMAGE: &[TagSpec] = &[
    TagSpec::handle(0xF54A, Handler::ImageRect),
    TagSpec::handle(0xF54B, Handler::ImageSize),
    TagSpec::handle(0xF54C, Handler::RefStream),
    TagSpec::attr(0xF555, "comment", Decode::String),
];

pub const IMAGE_STREAM: &[TagSpec] = &[TagSpec::attr(0xF555, "comment", Decode::String)];

pub const FONT: &[TagSpec] = &[
    TagSpec::attr(0xF559, "fontfilename", Decode::String),
    TagSpec::attr(0xF55D, "fontfacename", Decode::String),
];

pub const BUTTON: &[TagSpec] = &[
    TagSpec::handle(0xF503, Handler::ButtonRefImage),
    TagSpec::handle(0xF561, Handler::ButtonFlags),
    TagSpec::handle(0xF562, Handler::ButtonStateStart(ButtonState::Base)),
    TagSpec::handle(0xF563, Handler::ButtonStateEnd),
    TagSpec::handle(0xF564, Handler::ButtonStateStart(ButtonState::FocusIn)),
    TagSpec::handle(0xF565, Handler::ButtonStateEnd),
    TagSpec::handle(0xF566, Handler::ButtonStateStart(ButtonState::Push)),
    TagSpec::handle(0xF567, Handler::ButtonStateEnd),
    TagSpec::handle(0xF568, Handler::ButtonStateStart(ButtonState::Up)),
    TagSpec::handle(0xF569, Handler::ButtonStateEnd),
    TagSpec::handle(0xF56A, Handler::ActionsStart),
    TagSpec::handle(0xF56B, Handler::ActionsEnd),
    TagSpec::handle(0xF56C, Handler::JumpTo),
    TagSpec::handle(0xF56D, Handler::SendMessage),
    TagSpec::handle(0xF56E, Handler::CloseWindow),
    TagSpec::handle(0xF5D6, Handler::SoundStop),
    TagSpec::handle(0xF5F9, Handler::Run),
];

pub const BOOK_ATTR: &[TagSpec] = &[
    TagSpec::handle(0xF57B, Handler::PageTreeId),
    TagSpec::handle(0xF5D8, Handler::FontLink),
    TagSpec::attr(0xF5DA, "setwaitprop", Decode::Map(WAIT_PROPS)),
];
