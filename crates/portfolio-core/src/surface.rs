#![forbid(unsafe_code)]

//! The full rendering port a page host implements.

use crate::a11y::FocusSurface;
use crate::form::FormSurface;
use crate::image::ImageSurface;
use crate::nav::NavSurface;
use crate::notice::NoticeSurface;
use crate::scroll::ScrollSurface;

/// Every controller port at once.
///
/// Implemented automatically for any type implementing all of them.
pub trait Surface:
    NavSurface + FormSurface + ScrollSurface + ImageSurface + NoticeSurface + FocusSurface
{
}

impl<T> Surface for T where
    T: NavSurface + FormSurface + ScrollSurface + ImageSurface + NoticeSurface + FocusSurface
{
}
