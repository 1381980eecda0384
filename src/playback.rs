//! Image playback: decoding, aspect-preserving scaling, and animated
//! frame sequencing.
//!
//! The engine is a small state machine (`Idle -> {Static | Animated}`).
//! Loading a new path always tears the previous state down first,
//! cancelling its frame timer before any new timer is scheduled, so a
//! frame belonging to the previous image can never be displayed after
//! navigation.

use crate::error::{Result, SortError};
use crate::sched::{Scheduler, TimerId};
use image::codecs::gif::GifDecoder;
use image::imageops::FilterType;
use image::{AnimationDecoder, RgbaImage};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

/// Used when a frame does not specify a display duration.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);
/// Lower clamp so degenerate GIFs stay watchable.
pub const MIN_FRAME_DELAY: Duration = Duration::from_millis(20);

/// Frame buffers and playback position for the current animated image.
///
/// Owns the single pending frame-advance timer; there is never more
/// than one because each advance replaces the handle.
#[derive(Debug)]
pub struct AnimationState {
    frames: Vec<(RgbaImage, Duration)>,
    cursor: usize,
    timer: Option<TimerId>,
}

#[derive(Debug)]
enum State {
    Idle,
    Static { source: RgbaImage },
    Animated(AnimationState),
}

#[derive(Debug)]
pub struct PlaybackEngine {
    state: State,
    scaled: Option<RgbaImage>,
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackEngine {
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            scaled: None,
        }
    }

    /// Loads and displays the image at `path`.
    ///
    /// A GIF with more than one frame is decoded up front into
    /// `(bitmap, duration)` pairs and starts looping; anything else
    /// becomes a static display. On `Decode` errors the engine is left
    /// idle and the caller skips the file.
    pub fn load(
        &mut self,
        path: &Path,
        viewport: (u32, u32),
        sched: &mut Scheduler,
        now: Instant,
    ) -> Result<()> {
        // Teardown must precede construction: the prior image's timer is
        // cancelled before any new timer exists.
        self.teardown(sched);

        let is_gif = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("gif"))
            .unwrap_or(false);

        if is_gif {
            let frames = decode_gif_frames(path)?;
            if frames.len() > 1 {
                let first_delay = frames[0].1;
                self.scaled = scale_to_fit(&frames[0].0, viewport);
                self.state = State::Animated(AnimationState {
                    frames,
                    cursor: 0,
                    timer: Some(sched.schedule(now, first_delay)),
                });
                return Ok(());
            }
            if let Some((buffer, _)) = frames.into_iter().next() {
                self.scaled = scale_to_fit(&buffer, viewport);
                self.state = State::Static { source: buffer };
                return Ok(());
            }
            return Err(SortError::Decode {
                path: path.to_path_buf(),
                message: "GIF has no frames".to_string(),
            });
        }

        let img = image::open(path)
            .map_err(|e| SortError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .to_rgba8();
        self.scaled = scale_to_fit(&img, viewport);
        self.state = State::Static { source: img };
        Ok(())
    }

    /// Advances the animation when `id` is the live frame timer.
    ///
    /// Stale ids (from an image that was torn down) are ignored. After
    /// showing frame i the next timer runs for frame i's duration, and
    /// playback wraps around indefinitely.
    pub fn on_timer(
        &mut self,
        id: TimerId,
        viewport: (u32, u32),
        sched: &mut Scheduler,
        now: Instant,
    ) -> bool {
        let State::Animated(anim) = &mut self.state else {
            return false;
        };
        if anim.timer != Some(id) {
            return false;
        }
        anim.cursor = (anim.cursor + 1) % anim.frames.len();
        let (frame, delay) = &anim.frames[anim.cursor];
        self.scaled = scale_to_fit(frame, viewport);
        anim.timer = Some(sched.schedule(now, *delay));
        true
    }

    /// Recomputes the display bitmap for a new viewport. Zero-sized
    /// viewports clear the bitmap but keep the decoded state.
    pub fn rescale(&mut self, viewport: (u32, u32)) {
        self.scaled = match &self.state {
            State::Idle => None,
            State::Static { source } => scale_to_fit(source, viewport),
            State::Animated(anim) => scale_to_fit(&anim.frames[anim.cursor].0, viewport),
        };
    }

    /// Synchronously releases all decode buffers and cancels the frame
    /// timer. Called before every filesystem move of the current image
    /// and on navigation; this replaces any wait for handle release.
    pub fn teardown(&mut self, sched: &mut Scheduler) {
        if let State::Animated(anim) = &mut self.state {
            if let Some(id) = anim.timer.take() {
                sched.cancel(id);
            }
        }
        self.state = State::Idle;
        self.scaled = None;
    }

    /// The bitmap to render, already scaled to the viewport.
    pub fn display(&self) -> Option<&RgbaImage> {
        self.scaled.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.state, State::Animated(_))
    }

    pub fn owns_timer(&self, id: TimerId) -> bool {
        matches!(&self.state, State::Animated(anim) if anim.timer == Some(id))
    }

    pub fn frame_timer(&self) -> Option<TimerId> {
        match &self.state {
            State::Animated(anim) => anim.timer,
            _ => None,
        }
    }

    pub fn frame_cursor(&self) -> Option<usize> {
        match &self.state {
            State::Animated(anim) => Some(anim.cursor),
            _ => None,
        }
    }

    pub fn frame_count(&self) -> usize {
        match &self.state {
            State::Animated(anim) => anim.frames.len(),
            State::Static { .. } => 1,
            State::Idle => 0,
        }
    }

    pub fn frame_durations(&self) -> Vec<Duration> {
        match &self.state {
            State::Animated(anim) => anim.frames.iter().map(|(_, d)| *d).collect(),
            _ => Vec::new(),
        }
    }
}

fn decode_gif_frames(path: &Path) -> Result<Vec<(RgbaImage, Duration)>> {
    let decode_err = |message: String| SortError::Decode {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path).map_err(|e| decode_err(e.to_string()))?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(|e| decode_err(e.to_string()))?;
    let frames = decoder
        .into_frames()
        .collect_frames()
        .map_err(|e| decode_err(e.to_string()))?;

    Ok(frames
        .into_iter()
        .map(|frame| {
            let delay = frame_delay(frame.delay());
            (frame.into_buffer(), delay)
        })
        .collect())
}

/// A zero delay counts as unspecified and gets the 100 ms default;
/// everything else is clamped to the 20 ms minimum.
fn frame_delay(delay: image::Delay) -> Duration {
    let (numer, denom) = delay.numer_denom_ms();
    if denom == 0 {
        return DEFAULT_FRAME_DELAY;
    }
    let ms = u64::from(numer) / u64::from(denom);
    if ms == 0 {
        DEFAULT_FRAME_DELAY
    } else {
        Duration::from_millis(ms).max(MIN_FRAME_DELAY)
    }
}

/// Fits `(iw, ih)` inside `(vw, vh)` preserving aspect ratio, using the
/// same factor `min(vw/iw, vh/ih)` on both axes. Upscaling to fit is
/// allowed. Returns `None` when either rectangle has a zero dimension.
pub fn fit_dimensions(iw: u32, ih: u32, vw: u32, vh: u32) -> Option<(u32, u32)> {
    if iw == 0 || ih == 0 || vw == 0 || vh == 0 {
        return None;
    }
    let scale = (vw as f64 / iw as f64).min(vh as f64 / ih as f64);
    let w = ((iw as f64 * scale) as u32).clamp(1, vw);
    let h = ((ih as f64 * scale) as u32).clamp(1, vh);
    Some((w, h))
}

fn scale_to_fit(img: &RgbaImage, (vw, vh): (u32, u32)) -> Option<RgbaImage> {
    let (w, h) = fit_dimensions(img.width(), img.height(), vw, vh)?;
    if (w, h) == (img.width(), img.height()) {
        return Some(img.clone());
    }
    // Triangle keeps scaling fast for large photos.
    Some(image::imageops::resize(img, w, h, FilterType::Triangle))
}
