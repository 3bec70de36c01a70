use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc,
    },
    thread,
    time::Duration,
};

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;
use trellis_core::{
    KeyEvent, MouseEvent, Notification, Point, Property, Rect, Signal, Size, dispatch,
};

use super::with_runtime;
use crate::{Area, AreaHandle, AreaHandler, Window};

fn filled(clip: Rect) -> RgbaImage {
    let width = u32::try_from(clip.width()).unwrap();
    let height = u32::try_from(clip.height()).unwrap();
    RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]))
}

#[derive(Default)]
struct Recorder {
    clips: Arc<Mutex<Vec<Rect>>>,
    presses: Arc<AtomicUsize>,
}

impl AreaHandler for Recorder {
    fn paint(&mut self, clip: Rect) -> RgbaImage {
        self.clips.lock().push(clip);
        filled(clip)
    }

    fn mouse(&mut self, event: MouseEvent) -> bool {
        if event.is_press() {
            self.presses.fetch_add(1, Ordering::SeqCst);
            return true;
        }
        false
    }

    fn key(&mut self, event: KeyEvent) -> bool {
        event.key == Some('r')
    }
}

#[test]
fn paint_requests_are_clipped_to_the_drawing_size() {
    with_runtime(|driver| {
        let recorder = Recorder::default();
        let clips = recorder.clips.clone();
        let area = Area::new(40, 30, recorder);
        Window::new("paint", 100, 100, area.clone()).open();
        let handle = area.control().handle().unwrap();

        let image = driver.paint(handle, Rect::from_xywh(20, 20, 100, 100));
        assert_eq!(image.dimensions(), (20, 10));
        assert_eq!(*clips.lock(), [Rect::from_xywh(20, 20, 20, 10)]);

        let empty = driver.paint(handle, Rect::from_xywh(50, 0, 10, 10));
        assert_eq!(empty.dimensions(), (0, 0));
        assert_eq!(clips.lock().len(), 1);
    });
}

#[test]
fn press_focuses_and_redraw_requests_invalidate() {
    with_runtime(|driver| {
        let recorder = Recorder::default();
        let presses = recorder.presses.clone();
        let area = Area::new(10, 10, recorder);
        Window::new("input", 20, 20, area.clone()).open();
        let handle = area.control().handle().unwrap();
        let before = driver.invalidations(handle);

        driver.notify(handle, Notification::Mouse(MouseEvent::moved(Point::new(1, 1))));
        assert_eq!(driver.focused(), None);
        assert_eq!(driver.invalidations(handle), before);

        driver.notify(
            handle,
            Notification::Mouse(MouseEvent::pressed(Point::new(2, 2), 1)),
        );
        assert_eq!(driver.focused(), Some(handle));
        assert_eq!(driver.invalidations(handle), before + 1);
        assert_eq!(presses.load(Ordering::SeqCst), 1);

        driver.notify(handle, Notification::Key(KeyEvent::char('x')));
        assert_eq!(driver.invalidations(handle), before + 1);
        driver.notify(handle, Notification::Key(KeyEvent::char('r')));
        assert_eq!(driver.invalidations(handle), before + 2);
    });
}

#[test]
fn repaint_all_is_idempotent_apart_from_requests() {
    with_runtime(|driver| {
        let area = Area::new(64, 48, Recorder::default());
        Window::new("repaint", 64, 48, area.clone()).open();
        let handle = area.control().handle().unwrap();
        let before = driver.invalidations(handle);

        area.repaint_all();
        area.repaint_all();

        assert_eq!(area.size(), Size::new(64, 48));
        assert!(area.handle().needs_redraw());
        assert_eq!(driver.invalidations(handle), before + 2);
    });
}

#[test]
fn resize_from_a_worker_is_forwarded_to_the_ui_thread() {
    with_runtime(|driver| {
        let area = Area::new(10, 10, Recorder::default());
        Window::new("resize", 50, 50, area.clone()).open();
        let handle = area.control().handle().unwrap();

        let remote = area.handle();
        let done = Signal::new();
        let finished = done.clone();
        let worker = thread::spawn(move || {
            remote.set_size(200, 100);
            finished.post(());
        });
        done.recv();
        worker.join().unwrap();
        dispatch::pump(Some(Duration::ZERO));

        assert_eq!(area.size(), Size::new(200, 100));
        let record = driver.record(handle).unwrap();
        assert!(
            record
                .properties
                .contains(&Property::AreaSize(Size::new(200, 100)))
        );
        assert!(record.invalidations >= 1);
    });
}

/// Paints slowly and reports when painting starts and ends.
struct Slow {
    started: mpsc::Sender<()>,
    painting: Arc<AtomicBool>,
}

impl AreaHandler for Slow {
    fn paint(&mut self, clip: Rect) -> RgbaImage {
        self.painting.store(true, Ordering::SeqCst);
        let _ = self.started.send(());
        thread::sleep(Duration::from_millis(50));
        let image = filled(clip);
        self.painting.store(false, Ordering::SeqCst);
        image
    }
}

#[test]
fn resize_waits_for_a_paint_in_progress() {
    with_runtime(|driver| {
        let (started, started_rx) = mpsc::channel();
        let painting = Arc::new(AtomicBool::new(false));
        let area = Area::new(
            30,
            30,
            Slow {
                started,
                painting: painting.clone(),
            },
        );
        Window::new("slow", 30, 30, area.clone()).open();
        let handle = area.control().handle().unwrap();

        let remote = area.handle();
        let worker = thread::spawn(move || {
            started_rx.recv().unwrap();
            remote.set_size(60, 60);
            // The paint must have finished before the new size was stored.
            !painting.load(Ordering::SeqCst)
        });

        let image = driver.paint(handle, Rect::from_xywh(0, 0, 30, 30));
        assert_eq!(image.dimensions(), (30, 30));
        assert!(worker.join().unwrap());
        assert_eq!(area.size(), Size::new(60, 60));
    });
}

/// Tries to resize its own area from inside the handler.
struct Reentrant {
    me: Arc<OnceLock<AreaHandle>>,
}

impl AreaHandler for Reentrant {
    fn paint(&mut self, clip: Rect) -> RgbaImage {
        filled(clip)
    }

    fn mouse(&mut self, _event: MouseEvent) -> bool {
        if let Some(me) = self.me.get() {
            me.set_size(5, 5);
        }
        false
    }
}

#[test]
#[should_panic(expected = "called from inside the area's own handler")]
fn resizing_from_the_own_handler_panics() {
    with_runtime(|driver| {
        let me = Arc::new(OnceLock::new());
        let area = Area::new(10, 10, Reentrant { me: me.clone() });
        let _ = me.set(area.handle());
        Window::new("reentrant", 10, 10, area.clone()).open();

        driver.notify(
            area.control().handle().unwrap(),
            Notification::Mouse(MouseEvent::moved(Point::zero())),
        );
    });
}

struct Undersized;

impl AreaHandler for Undersized {
    fn paint(&mut self, clip: Rect) -> RgbaImage {
        RgbaImage::new(1, u32::try_from(clip.height()).unwrap())
    }
}

#[test]
#[should_panic(expected = "area handler returned a 1x10 image for a 10x10 clip")]
fn mismatched_paint_buffer_panics() {
    with_runtime(|driver| {
        let area = Area::new(10, 10, Undersized);
        Window::new("bad", 10, 10, area.clone()).open();
        let _ = driver.paint(area.control().handle().unwrap(), Rect::from_size(Size::new(10, 10)));
    });
}
