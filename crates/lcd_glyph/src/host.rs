//! Seams to the application that owns the panels.
//!
//! The host supplies a file picker, an image decoder, the panel itself and a
//! way to show errors. [`ImportJob`] runs picking, decoding and conversion on
//! a worker thread and hands the result back over a one-shot channel, so the
//! host applies it on whichever thread is allowed to touch the panel.

use std::any::TypeId;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crate::buffer::PixelBuffer;
use crate::glyph::TextBlock;
use crate::grid::{GridSize, Orientation, SurfaceProfile};
use crate::pipeline::{convert, Conversion, DisplayConfig};
use crate::{ErrorKind, GlyphError, Result, WriteBackError};

/// Answer of a file picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Chosen(PathBuf),
    Cancelled,
}

pub trait Selector {
    fn select(&mut self) -> Selection;
}

/// Turns a file into pixels. Failures are reported as [`GlyphError::Decode`].
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<PixelBuffer>;
}

/// A text panel that can receive a converted image.
pub trait Surface {
    fn profile(&self) -> SurfaceProfile;

    fn orientation(&self) -> Orientation;

    /// False once the panel was closed or stopped working.
    fn is_alive(&self) -> bool {
        true
    }

    /// Apply `config`, then replace the panel text with `text`.
    fn apply(
        &mut self,
        text: &TextBlock,
        config: &DisplayConfig,
    ) -> core::result::Result<(), WriteBackError>;
}

/// A user-facing error message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: ErrorKind,
    /// How long the message stays on screen.
    pub duration: Duration,
}

impl Notification {
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(5);

    pub fn for_error(error: &GlyphError) -> Self {
        Self {
            kind: error.kind(),
            duration: Self::DEFAULT_DURATION,
        }
    }

    pub fn message(&self) -> String {
        format!("Error while processing image: {}", self.kind)
    }
}

/// Shows notifications. Implementations must swallow their own failures.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The user closed the picker; nothing happened.
    Cancelled,
    /// The panel now shows the image.
    Applied(GridSize),
    /// Nothing was written and one notification was sent.
    Failed(ErrorKind),
}

type JobMessage = Option<Result<Conversion>>;

/// An image import running on a worker thread.
pub struct ImportJob {
    receiver: mpsc::Receiver<JobMessage>,
}

impl ImportJob {
    /// Start picking, decoding and converting for a panel of `profile`
    /// rotated by `orientation`. Both are read before the worker starts.
    pub fn spawn<S, D>(
        mut selector: S,
        decoder: D,
        profile: SurfaceProfile,
        orientation: Orientation,
    ) -> Self
    where
        S: Selector + Send + 'static,
        D: ImageDecoder + Send + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel(1);
        thread::spawn(move || {
            let message = load_and_convert(&mut selector, &decoder, profile, orientation);
            // The host may have dropped the job; nobody is left to tell.
            let _ = sender.send(message);
        });
        Self { receiver }
    }

    /// Wait for the worker, then write the result to `surface`.
    ///
    /// Call on the thread that owns `surface`.
    pub fn finish<T, N>(self, surface: &mut T, notifier: &N) -> ImportOutcome
    where
        T: Surface + ?Sized,
        N: Notifier + ?Sized,
    {
        let message = self
            .receiver
            .recv()
            .unwrap_or_else(|_| Some(Err(worker_lost())));
        deliver(message, surface, notifier)
    }

    /// Non-blocking [`ImportJob::finish`]. Returns `None` while the worker is
    /// still running; drop the job once this returns `Some`.
    pub fn try_finish<T, N>(&mut self, surface: &mut T, notifier: &N) -> Option<ImportOutcome>
    where
        T: Surface + ?Sized,
        N: Notifier + ?Sized,
    {
        let message = match self.receiver.try_recv() {
            Ok(message) => message,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(worker_lost())),
        };
        Some(deliver(message, surface, notifier))
    }
}

/// [`ImportJob`] without the worker thread.
pub fn run_import<S, D, T, N>(
    selector: &mut S,
    decoder: &D,
    surface: &mut T,
    notifier: &N,
) -> ImportOutcome
where
    S: Selector + ?Sized,
    D: ImageDecoder + ?Sized,
    T: Surface + ?Sized,
    N: Notifier + ?Sized,
{
    let message = load_and_convert(selector, decoder, surface.profile(), surface.orientation());
    deliver(message, surface, notifier)
}

fn load_and_convert<S, D>(
    selector: &mut S,
    decoder: &D,
    profile: SurfaceProfile,
    orientation: Orientation,
) -> JobMessage
where
    S: Selector + ?Sized,
    D: ImageDecoder + ?Sized,
{
    let path = match selector.select() {
        Selection::Chosen(path) => path,
        Selection::Cancelled => {
            tracing::debug!("image selection cancelled");
            return None;
        }
    };
    tracing::debug!(path = %path.display(), %profile, "importing image");
    Some(decoder.decode(&path).and_then(|image| convert(image, profile, orientation)))
}

fn deliver<T, N>(message: JobMessage, surface: &mut T, notifier: &N) -> ImportOutcome
where
    T: Surface + ?Sized,
    N: Notifier + ?Sized,
{
    let Some(result) = message else {
        return ImportOutcome::Cancelled;
    };
    match result.and_then(|conversion| write_back(surface, &conversion)) {
        Ok(grid) => ImportOutcome::Applied(grid),
        Err(e) => {
            tracing::warn!(error = %e, kind = %e.kind(), "image import failed");
            let notification = Notification::for_error(&e);
            notifier.notify(notification);
            ImportOutcome::Failed(notification.kind)
        }
    }
}

fn write_back<T: Surface + ?Sized>(surface: &mut T, conversion: &Conversion) -> Result<GridSize> {
    if !surface.is_alive() {
        return Err(WriteBackError::SurfaceDetached.into());
    }
    surface.apply(&conversion.text, &conversion.config)?;
    Ok(conversion.grid)
}

fn worker_lost() -> GlyphError {
    GlyphError::Decode("conversion worker stopped without a result".to_string())
}

/// Tracks which entity types already had their panel controls installed.
///
/// Hosts call their control setup hook repeatedly; the registry makes the
/// install step run once per entity type.
#[derive(Debug, Default)]
pub struct ControlRegistry {
    registered: HashSet<TypeId>,
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `install` unless it already ran for `T`. Returns whether it ran.
    pub fn register_once<T: 'static>(&mut self, install: impl FnOnce()) -> bool {
        if !self.registered.insert(TypeId::of::<T>()) {
            return false;
        }
        install();
        true
    }

    pub fn is_registered<T: 'static>(&self) -> bool {
        self.registered.contains(&TypeId::of::<T>())
    }
}
