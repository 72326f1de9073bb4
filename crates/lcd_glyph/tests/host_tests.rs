use std::cell::RefCell;
use std::path::{Path, PathBuf};

use lcd_glyph::*;
use pretty_assertions::assert_eq;

struct FixedSelector(Selection);

impl Selector for FixedSelector {
    fn select(&mut self) -> Selection {
        self.0.clone()
    }
}

/// Decodes any path into a fixed buffer, or fails for paths ending in `.bad`.
#[derive(Clone)]
struct StubDecoder {
    image: PixelBuffer,
}

impl ImageDecoder for StubDecoder {
    fn decode(&self, path: &Path) -> lcd_glyph::Result<PixelBuffer> {
        if path.extension().is_some_and(|ext| ext == "bad") {
            return Err(GlyphError::Decode("not an image".to_string()));
        }
        Ok(self.image.clone())
    }
}

struct RecordingSurface {
    profile: SurfaceProfile,
    orientation: Orientation,
    alive: bool,
    reject: bool,
    written: Vec<(TextBlock, DisplayConfig)>,
}

impl RecordingSurface {
    fn new(profile: SurfaceProfile) -> Self {
        Self {
            profile,
            orientation: Orientation::NONE,
            alive: true,
            reject: false,
            written: Vec::new(),
        }
    }
}

impl Surface for RecordingSurface {
    fn profile(&self) -> SurfaceProfile {
        self.profile
    }

    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn apply(
        &mut self,
        text: &TextBlock,
        config: &DisplayConfig,
    ) -> std::result::Result<(), WriteBackError> {
        if self.reject {
            return Err(WriteBackError::Rejected("panel is busy".to_string()));
        }
        self.written.push((text.clone(), config.clone()));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    seen: RefCell<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.borrow_mut().push(notification);
    }
}

fn decoder() -> StubDecoder {
    StubDecoder {
        image: PixelBuffer::filled(20, 10, Rgb::new(0, 128, 255)),
    }
}

fn chosen(path: &str) -> FixedSelector {
    FixedSelector(Selection::Chosen(PathBuf::from(path)))
}

#[test]
fn test_import_applies_text() {
    let mut surface = RecordingSurface::new(SurfaceProfile::LargeLcdPanel5x3);
    let notifier = RecordingNotifier::default();

    let outcome = run_import(&mut chosen("cat.png"), &decoder(), &mut surface, &notifier);

    assert_eq!(outcome, ImportOutcome::Applied(GridSize::new(178, 107)));
    assert_eq!(surface.written.len(), 1);
    let (text, config) = &surface.written[0];
    assert_eq!(text.height(), 107);
    assert_eq!(config.font, MONOSPACE_FONT);
    assert!(notifier.seen.borrow().is_empty());
}

#[test]
fn test_cancel_does_nothing() {
    let mut surface = RecordingSurface::new(SurfaceProfile::Default);
    let notifier = RecordingNotifier::default();
    let mut selector = FixedSelector(Selection::Cancelled);

    let outcome = run_import(&mut selector, &decoder(), &mut surface, &notifier);

    assert_eq!(outcome, ImportOutcome::Cancelled);
    assert!(surface.written.is_empty());
    assert!(notifier.seen.borrow().is_empty());
}

#[test]
fn test_malformed_image_is_not_written() {
    let mut surface = RecordingSurface::new(SurfaceProfile::Default);
    let notifier = RecordingNotifier::default();
    let empty = StubDecoder {
        image: PixelBuffer::from_rgb8(0, 0, &[]).unwrap(),
    };

    let outcome = run_import(&mut chosen("empty.png"), &empty, &mut surface, &notifier);

    assert_eq!(outcome, ImportOutcome::Failed(ErrorKind::MalformedImage));
    assert!(surface.written.is_empty());
    let seen = notifier.seen.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, ErrorKind::MalformedImage);
}

#[test]
fn test_decode_error_notifies_once() {
    let mut surface = RecordingSurface::new(SurfaceProfile::Default);
    let notifier = RecordingNotifier::default();

    let outcome = run_import(&mut chosen("broken.bad"), &decoder(), &mut surface, &notifier);

    assert_eq!(outcome, ImportOutcome::Failed(ErrorKind::DecodeError));
    assert!(surface.written.is_empty());
    assert_eq!(notifier.seen.borrow().len(), 1);
}

#[test]
fn test_detached_surface() {
    let mut surface = RecordingSurface::new(SurfaceProfile::Default);
    surface.alive = false;
    let notifier = RecordingNotifier::default();

    let outcome = run_import(&mut chosen("cat.png"), &decoder(), &mut surface, &notifier);

    assert_eq!(outcome, ImportOutcome::Failed(ErrorKind::WriteBackFailure));
    assert!(surface.written.is_empty());
    assert_eq!(notifier.seen.borrow()[0].kind, ErrorKind::WriteBackFailure);
}

#[test]
fn test_rejected_write_back() {
    let mut surface = RecordingSurface::new(SurfaceProfile::Default);
    surface.reject = true;
    let notifier = RecordingNotifier::default();

    let outcome = run_import(&mut chosen("cat.png"), &decoder(), &mut surface, &notifier);

    assert_eq!(outcome, ImportOutcome::Failed(ErrorKind::WriteBackFailure));
    assert_eq!(notifier.seen.borrow().len(), 1);
}

#[test]
fn test_background_job_hands_result_back() {
    let mut surface = RecordingSurface::new(SurfaceProfile::LargeLcdPanelWide);
    surface.orientation = Orientation::from_degrees(90.0);
    let notifier = RecordingNotifier::default();

    let job = ImportJob::spawn(
        chosen("cat.png"),
        decoder(),
        surface.profile(),
        surface.orientation(),
    );
    let outcome = job.finish(&mut surface, &notifier);

    assert_eq!(outcome, ImportOutcome::Applied(GridSize::new(178, 356)));
    assert_eq!(surface.written.len(), 1);
}

#[test]
fn test_background_job_polling() {
    let mut surface = RecordingSurface::new(SurfaceProfile::Default);
    let notifier = RecordingNotifier::default();

    let mut job = ImportJob::spawn(
        FixedSelector(Selection::Cancelled),
        decoder(),
        surface.profile(),
        surface.orientation(),
    );
    let outcome = loop {
        if let Some(outcome) = job.try_finish(&mut surface, &notifier) {
            break outcome;
        }
        std::thread::yield_now();
    };

    assert_eq!(outcome, ImportOutcome::Cancelled);
    assert!(surface.written.is_empty());
    assert!(notifier.seen.borrow().is_empty());
}

#[test]
fn test_independent_jobs_run_concurrently() {
    let jobs: Vec<_> = (0..4)
        .map(|i| {
            ImportJob::spawn(
                chosen(&format!("image{i}.png")),
                decoder(),
                SurfaceProfile::Default,
                Orientation::from_steps(i),
            )
        })
        .collect();

    let notifier = RecordingNotifier::default();
    for job in jobs {
        let mut surface = RecordingSurface::new(SurfaceProfile::Default);
        assert_eq!(
            job.finish(&mut surface, &notifier),
            ImportOutcome::Applied(GridSize::new(178, 178))
        );
    }
}
