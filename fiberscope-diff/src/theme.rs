//! Colors used by the change report.

use owo_colors::Rgb;

pub(crate) const DELETION: Rgb = Rgb(247, 118, 142);
pub(crate) const INSERTION: Rgb = Rgb(158, 206, 106);
pub(crate) const FIELD_NAME: Rgb = Rgb(125, 207, 255);
pub(crate) const MUTED: Rgb = Rgb(86, 95, 137);
