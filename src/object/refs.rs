use super::{ButtonAction, LrfObject, ObjectBody, ObjectKind};
use crate::schema::int_attr;

/// A link from one object to another, with the kinds it may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub field: &'static str,
    pub target: u32,
    /// Allowed target kinds; empty means any kind.
    pub allowed: &'static [ObjectKind],
    /// Optional links may dangle; the binder only warns.
    pub optional: bool,
}

impl Reference {
    const fn required(field: &'static str, target: u32, allowed: &'static [ObjectKind]) -> Self {
        Self {
            field,
            target,
            allowed,
            optional: false,
        }
    }

    const fn optional(field: &'static str, target: u32, allowed: &'static [ObjectKind]) -> Self {
        Self {
            field,
            target,
            allowed,
            optional: true,
        }
    }

    pub fn accepts(&self, kind: ObjectKind) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&kind)
    }

    /// Human-readable list of allowed kinds for error messages.
    pub fn expected(&self) -> &'static str {
        match self.allowed {
            [] => "any object",
            [ObjectKind::PageAttr] => "PageAttr",
            [ObjectKind::BlockAttr] => "BlockAttr",
            [ObjectKind::TextAttr] => "TextAttr",
            [ObjectKind::Page] => "Page",
            [ObjectKind::PageTree] => "PageTree",
            [ObjectKind::ImageStream] => "ImageStream",
            [ObjectKind::Font] => "Font",
            [ObjectKind::Header, ObjectKind::Footer] => "Header or Footer",
            _ => "another kind",
        }
    }
}

const HEADERS_FOOTERS: &[ObjectKind] = &[ObjectKind::Header, ObjectKind::Footer];

impl LrfObject {
    /// Every link this object declares through its tags.
    ///
    /// Links discovered inside streams (page content, block content, canvas
    /// records, text plots, TOC entries) are resolved when those streams are
    /// interpreted.
    pub fn references(&self) -> Vec<Reference> {
        let mut refs = Vec::new();

        if let Some(info) = self.info_link {
            refs.push(Reference::optional("infolink", info, &[]));
        }
        if let Some(style) = self.style_id {
            let allowed: &'static [ObjectKind] = match self.kind {
                ObjectKind::Page => &[ObjectKind::PageAttr],
                ObjectKind::Block => &[ObjectKind::BlockAttr],
                ObjectKind::Text | ObjectKind::SimpleText => &[ObjectKind::TextAttr],
                _ => &[],
            };
            refs.push(Reference::required("style", style, allowed));
        }
        for field in ["oddheaderid", "evenheaderid", "oddfooterid", "evenfooterid"] {
            if let Some(id) = int_attr(&self.attrs, field) {
                refs.push(Reference::optional(field, id as u32, HEADERS_FOOTERS));
            }
        }
        if let Some(id) = int_attr(&self.attrs, "refbgimage") {
            refs.push(Reference::required("refbgimage", id as u32, &[]));
        }
        if let Some(id) = int_attr(&self.attrs, "refempdotsfont").filter(|id| *id != 0) {
            refs.push(Reference::optional("refempdotsfont", id as u32, &[]));
        }

        match &self.body {
            ObjectBody::PageTree(pages) => {
                for &page in pages {
                    refs.push(Reference::required("page", page, &[ObjectKind::Page]));
                }
            }
            ObjectBody::Page(page) => {
                if let Some(parent) = page.parent {
                    refs.push(Reference::required("parent", parent, &[ObjectKind::PageTree]));
                }
                for &id in &page.object_list {
                    refs.push(Reference::optional("objectlist", id, &[]));
                }
            }
            ObjectBody::Image(image) => {
                if let Some(stream) = image.refstream {
                    refs.push(Reference::required("refstream", stream, &[ObjectKind::ImageStream]));
                }
            }
            ObjectBody::BookAttr(book) => {
                if let Some(tree) = book.page_tree {
                    refs.push(Reference::required("pagetree", tree, &[ObjectKind::PageTree]));
                }
                for &font in &book.fonts {
                    refs.push(Reference::required("font", font, &[ObjectKind::Font]));
                }
            }
            ObjectBody::Button(button) => {
                for data in button.states.values() {
                    if let Some(image) = data.refimage {
                        refs.push(Reference::required("refimage", image, &[]));
                    }
                    for action in &data.actions {
                        match *action {
                            ButtonAction::JumpTo { page, object } => {
                                refs.push(Reference::required("refpage", page, &[ObjectKind::Page]));
                                refs.push(Reference::required("refobj", object, &[]));
                            }
                            ButtonAction::Run { object, .. } => {
                                refs.push(Reference::optional("refobj", object, &[]));
                            }
                            _ => {}
                        }
                    }
                }
            }
            _ => {}
        }
        refs
    }
}
