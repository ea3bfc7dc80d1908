use core::fmt;

use alloc::string::String;

/// Layout the window manager applies to a rendered element.
///
/// Only layout concerns are touched; everything else about the element belongs to the
/// factory that produced it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementLayout {
    pub index: usize,
    /// Start offset along the scroll axis, in virtual coordinates.
    pub offset: f64,
    /// Size along the scroll axis: the measured size, or the estimate before measurement.
    pub size: f64,
    pub measured: bool,
    /// Inside the viewport (false for overscan items).
    pub visible: bool,
}

impl ElementLayout {
    pub fn end(&self) -> f64 {
        self.offset + self.size
    }
}

/// A live view element owned by the window manager while its index is in range.
pub trait ViewElement {
    /// Current size along the scroll axis, or `None` when the element is detached from
    /// the host and cannot be measured.
    fn measure(&self) -> Option<f64>;

    fn place(&mut self, layout: &ElementLayout);
}

/// What an [`ElementFactory`] produced for an item.
#[derive(Debug)]
pub enum Rendered<E> {
    Element(E),
    /// Markup the factory wants materialized through [`ElementFactory::from_markup`].
    Markup(String),
}

/// Why an element could not be created. The index is retried on the next render pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TemplateError {
    Failed { index: usize, reason: String },
    MarkupUnsupported { index: usize },
}

impl TemplateError {
    pub fn failed(index: usize, reason: impl Into<String>) -> Self {
        TemplateError::Failed {
            index,
            reason: reason.into(),
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TemplateError::Failed { index, .. } | TemplateError::MarkupUnsupported { index } => {
                *index
            }
        }
    }
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Failed { index, reason } => {
                write!(f, "failed to render item {index}: {reason}")
            }
            TemplateError::MarkupUnsupported { index } => {
                write!(f, "item {index}: factory returned markup it cannot materialize")
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// Turns data items into view elements.
pub trait ElementFactory<T> {
    type Element: ViewElement;

    fn render(&mut self, item: &T, index: usize) -> Result<Rendered<Self::Element>, TemplateError>;

    fn from_markup(&mut self, markup: String, index: usize) -> Result<Self::Element, TemplateError> {
        let _ = markup;
        Err(TemplateError::MarkupUnsupported { index })
    }

    /// Called when an element leaves the render window or the manager is destroyed.
    ///
    /// The default drops the element.
    fn recycle(&mut self, index: usize, element: Self::Element) {
        let _ = (index, element);
    }
}
