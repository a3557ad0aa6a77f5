//! Image preview carousel state machine.
//!
//! The view owns a horizontally scrolling strip with one viewport-wide page per
//! image. The controller never tracks the current index independently of the
//! strip: it is recomputed from the scroll offset on every [`CarouselInput::Scrolled`].
//! Programmatic navigation only asks the view to scroll and waits for the
//! resulting scroll events.

use crate::controller::{
    navigation::FormFactor,
    scroll_lock::{PageScrollLock, ScrollLockGuard},
};

/// Offsets closer than this to a page boundary count as settled.
const SETTLED_EPSILON: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Escape,
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CarouselInput {
    Open {
        images: Vec<String>,
        initial_index: usize,
    },
    Close,
    Key(NavKey),
    PrevArrow,
    NextArrow,
    ImageClicked,
    Scrolled {
        offset: f32,
        page_width: f32,
    },
    PointerReleased {
        offset: f32,
        page_width: f32,
    },
    /// The strip has been laid out and painted at least once.
    FramePainted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselEffect {
    None,
    ScrollToPage {
        index: usize,
        behavior: ScrollBehavior,
    },
    Closed,
}

/// Inputs supplied by the owner of the carousel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarouselProps {
    pub images: Vec<String>,
    pub visible: bool,
    pub initial_index: usize,
}

#[derive(Debug)]
struct OpenSession {
    images: Vec<String>,
    current: usize,
    initial_index: usize,
    pending_initial_scroll: Option<usize>,
    smooth_target: Option<usize>,
    lock: ScrollLockGuard,
}

impl OpenSession {
    fn last_index(&self) -> usize {
        self.images.len().saturating_sub(1)
    }

    fn clamp(&self, index: isize) -> usize {
        index.clamp(0, self.last_index() as isize) as usize
    }

    fn nearest_page(&self, offset: f32, page_width: f32) -> usize {
        let raw = (offset / page_width).round();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.last_index())
        }
    }
}

#[derive(Debug)]
pub struct CarouselState {
    lock: PageScrollLock,
    session: Option<OpenSession>,
}

impl CarouselState {
    pub fn new(lock: PageScrollLock) -> Self {
        Self {
            lock,
            session: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn current(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.current)
    }

    pub fn images(&self) -> &[String] {
        self.session.as_ref().map_or(&[], |s| s.images.as_slice())
    }

    /// True until the deferred initial scroll has been emitted.
    pub fn awaiting_first_paint(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.pending_initial_scroll.is_some())
    }

    pub fn is_settling(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.smooth_target.is_some())
    }

    pub fn show_prev_arrow(&self, form_factor: FormFactor) -> bool {
        self.arrows_enabled(form_factor) && self.current().is_some_and(|c| c > 0)
    }

    pub fn show_next_arrow(&self, form_factor: FormFactor) -> bool {
        self.arrows_enabled(form_factor)
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.current < s.last_index())
    }

    /// `"current / total"`, only when there is more than one image.
    pub fn page_indicator(&self) -> Option<String> {
        let session = self.session.as_ref()?;
        (session.images.len() > 1)
            .then(|| format!("{} / {}", session.current + 1, session.images.len()))
    }

    /// Reconciles the carousel with its owner's props. A false→true visibility
    /// change opens; a changed index or image list while visible re-opens.
    pub fn sync(&mut self, props: &CarouselProps) -> CarouselEffect {
        if !props.visible {
            return self.handle(CarouselInput::Close);
        }
        let changed = match &self.session {
            None => true,
            Some(session) => {
                session.initial_index != props.initial_index || session.images != props.images
            }
        };
        if !changed || (props.images.is_empty() && self.session.is_none()) {
            return CarouselEffect::None;
        }
        self.handle(CarouselInput::Open {
            images: props.images.clone(),
            initial_index: props.initial_index,
        })
    }

    pub fn handle(&mut self, input: CarouselInput) -> CarouselEffect {
        match input {
            CarouselInput::Open {
                images,
                initial_index,
            } => self.open(images, initial_index),
            CarouselInput::Close
            | CarouselInput::Key(NavKey::Escape)
            | CarouselInput::ImageClicked => self.close(),
            CarouselInput::Key(NavKey::ArrowLeft) | CarouselInput::PrevArrow => self.step(-1),
            CarouselInput::Key(NavKey::ArrowRight) | CarouselInput::NextArrow => self.step(1),
            CarouselInput::Scrolled { offset, page_width } => {
                self.scrolled(offset, page_width);
                CarouselEffect::None
            }
            CarouselInput::PointerReleased { offset, page_width } => {
                self.settle(offset, page_width)
            }
            CarouselInput::FramePainted => match self
                .session
                .as_mut()
                .and_then(|s| s.pending_initial_scroll.take())
            {
                Some(index) => CarouselEffect::ScrollToPage {
                    index,
                    behavior: ScrollBehavior::Instant,
                },
                None => CarouselEffect::None,
            },
        }
    }

    fn arrows_enabled(&self, form_factor: FormFactor) -> bool {
        !form_factor.is_compact() && self.images().len() > 1
    }

    fn open(&mut self, images: Vec<String>, initial_index: usize) -> CarouselEffect {
        if images.is_empty() {
            return self.close();
        }
        let current = initial_index.min(images.len() - 1);
        // Re-opening keeps the guard already held by this carousel.
        let lock = match self.session.take() {
            Some(previous) => previous.lock,
            None => self.lock.acquire(),
        };
        self.session = Some(OpenSession {
            images,
            current,
            initial_index,
            pending_initial_scroll: Some(current),
            smooth_target: None,
            lock,
        });
        CarouselEffect::None
    }

    fn close(&mut self) -> CarouselEffect {
        match self.session.take() {
            Some(_) => CarouselEffect::Closed,
            None => CarouselEffect::None,
        }
    }

    fn step(&mut self, delta: isize) -> CarouselEffect {
        let Some(session) = self.session.as_mut() else {
            return CarouselEffect::None;
        };
        let target = session.clamp(session.current as isize + delta);
        if target == session.current {
            return CarouselEffect::None;
        }
        session.smooth_target = Some(target);
        CarouselEffect::ScrollToPage {
            index: target,
            behavior: ScrollBehavior::Smooth,
        }
    }

    fn scrolled(&mut self, offset: f32, page_width: f32) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !usable(offset, page_width) || session.pending_initial_scroll.is_some() {
            return;
        }
        let index = session.nearest_page(offset, page_width);
        session.current = index;
        if session.smooth_target == Some(index)
            && (offset - index as f32 * page_width).abs() < SETTLED_EPSILON
        {
            session.smooth_target = None;
        }
    }

    fn settle(&mut self, offset: f32, page_width: f32) -> CarouselEffect {
        let Some(session) = self.session.as_mut() else {
            return CarouselEffect::None;
        };
        if !usable(offset, page_width) || session.pending_initial_scroll.is_some() {
            return CarouselEffect::None;
        }
        let index = session.nearest_page(offset, page_width);
        if (offset - index as f32 * page_width).abs() < SETTLED_EPSILON {
            return CarouselEffect::None;
        }
        session.smooth_target = Some(index);
        CarouselEffect::ScrollToPage {
            index,
            behavior: ScrollBehavior::Smooth,
        }
    }
}

fn usable(offset: f32, page_width: f32) -> bool {
    offset.is_finite() && page_width.is_finite() && page_width > 0.0
}

#[cfg(test)]
#[path = "tests/carousel_tests.rs"]
mod tests;
