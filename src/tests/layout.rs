use std::time::Duration;

use trellis_core::{ControlKind, Rect, dispatch};

use super::{sized, sized_control, with_runtime};
use crate::{Grid, Spacer, Stack, Window};

#[test]
fn vertical_stack_leaves_trailing_space() {
    with_runtime(|driver| {
        let first = sized(100, 20);
        let second = sized(100, 30);
        let stack = Stack::vertical([first.clone().into(), second.clone().into()]);
        let window = Window::new("stack", 100, 60, stack);
        window.open();

        let first = first.control().handle().unwrap();
        let second = second.control().handle().unwrap();
        assert_eq!(driver.rect(first), Some(Rect::from_xywh(0, 0, 100, 20)));
        assert_eq!(driver.rect(second), Some(Rect::from_xywh(0, 20, 100, 30)));
    });
}

#[test]
fn stretchy_child_takes_the_remainder_after_resize() {
    with_runtime(|driver| {
        let first = sized(100, 20);
        let second = sized(100, 30);
        let stack = Stack::vertical([first.clone().into(), second.clone().into()]);
        stack.set_stretchy(1);
        let window = Window::new("stack", 100, 60, stack);
        window.open();

        driver.resize(window.handle().unwrap(), 100, 80);

        let second_handle = second.control().handle().unwrap();
        assert_eq!(
            driver.rect(second_handle),
            Some(Rect::from_xywh(0, 20, 100, 60))
        );
        assert_eq!(second.control().assigned_rect(), Rect::from_xywh(0, 20, 100, 60));
        assert_eq!(first.control().assigned_rect(), Rect::from_xywh(0, 0, 100, 20));
    });
}

#[test]
fn grid_stretchy_cell_absorbs_space() {
    with_runtime(|driver| {
        let cells = [
            sized(10, 10),
            sized(20, 10),
            sized(10, 20),
            sized(20, 20),
        ];
        let grid = Grid::new(2, cells.iter().cloned().map(Into::into));
        grid.set_stretchy(1, 1);
        Window::new("grid", 100, 100, grid).open();

        let rects: Vec<_> = cells
            .iter()
            .map(|cell| driver.rect(cell.control().handle().unwrap()).unwrap())
            .collect();
        assert_eq!(rects[0], Rect::from_xywh(0, 0, 10, 10));
        assert_eq!(rects[1], Rect::from_xywh(10, 0, 20, 10));
        assert_eq!(rects[2], Rect::from_xywh(0, 10, 10, 20));
        assert_eq!(rects[3], Rect::from_xywh(10, 10, 90, 90));
    });
}

#[test]
fn nested_containers_are_laid_out_in_window_coordinates() {
    with_runtime(|driver| {
        let leading = sized(30, 10);
        let trailing = sized(30, 10);
        let row = Stack::horizontal([leading.clone().into(), Spacer::new().into(), trailing.clone().into()]);
        row.set_stretchy(1);
        let column = Stack::vertical([sized_control(200, 40), row.into()]);
        Window::new("nested", 200, 100, column).open();

        let trailing = driver.rect(trailing.control().handle().unwrap()).unwrap();
        assert_eq!(trailing, Rect::from_xywh(170, 40, 30, 10));
        let leading = driver.rect(leading.control().handle().unwrap()).unwrap();
        assert_eq!(leading, Rect::from_xywh(0, 40, 30, 10));
    });
}

#[test]
fn containers_and_spacers_have_no_native_widget() {
    let driver = with_runtime(|driver| {
        let stack = Stack::vertical([
            sized_control(10, 10),
            Spacer::new().into(),
            Stack::horizontal([sized_control(5, 5)]).into(),
        ]);
        Window::new("count", 50, 50, stack).open();

        assert_eq!(driver.widgets_of(ControlKind::Window).len(), 1);
        assert_eq!(driver.widgets_of(ControlKind::Label).len(), 2);
        assert_eq!(driver.widgets().len(), 3);
    });
    assert!(driver.is_stopped());
}

#[test]
fn window_resize_request_relays_out_after_backend_reports() {
    with_runtime(|driver| {
        let label = sized(10, 10);
        let stack = Stack::vertical([label.clone().into()]);
        stack.set_stretchy(0);
        let window = Window::new("resize", 100, 100, stack);
        window.open();
        let handle = label.control().handle().unwrap();
        assert_eq!(driver.rect(handle), Some(Rect::from_xywh(0, 0, 100, 100)));

        window.set_size(300, 200);
        dispatch::pump(Some(Duration::ZERO));

        assert_eq!(driver.rect(handle), Some(Rect::from_xywh(0, 0, 300, 200)));
        assert_eq!(window.client_size(), trellis_core::Size::new(300, 200));
    });
}

#[test]
fn every_widget_gets_exactly_one_rect_per_pass() {
    with_runtime(|driver| {
        let labels: Vec<_> = (0..4).map(|_| sized(10, 10)).collect();
        let grid = Grid::new(2, labels.iter().cloned().map(Into::into));
        grid.set_filling(0, 0);
        let window = Window::new("grid", 40, 40, grid);
        window.open();
        driver.resize(window.handle().unwrap(), 60, 60);

        for label in &labels {
            let handle = label.control().handle().unwrap();
            assert_eq!(driver.rect(handle), Some(label.control().assigned_rect()));
        }
    });
}

#[test]
#[should_panic(expected = "cannot change a control after its window was created")]
fn stretch_flags_freeze_when_the_window_is_created() {
    with_runtime(|_| {
        let stack = Stack::vertical([sized_control(10, 10)]);
        Window::new("frozen", 10, 10, stack.clone()).create();
        stack.set_stretchy(0);
    });
}
