use trellis_core::{ControlKind, Notification, Property, Signal};

use super::{sized_control, with_runtime};
use crate::{
    Button, Checkbox, Combobox, Label, LineEdit, Listbox, ProgressBar, Stack, Window,
};

#[test]
fn creation_passes_initial_content_to_the_backend() {
    with_runtime(|driver| {
        let label = Label::standalone("Name");
        let edit = LineEdit::password();
        let stack = Stack::vertical([label.clone().into(), edit.clone().into()]);
        let window = Window::new("Login", 200, 80, stack);
        window.create();

        let window_record = driver.record(window.handle().unwrap()).unwrap();
        assert_eq!(window_record.kind, ControlKind::Window);
        assert_eq!(window_record.text(), Some("Login"));
        assert!(!window_record.is_visible());

        let label_record = driver.record(label.control().handle().unwrap()).unwrap();
        assert_eq!(label_record.parent, window.handle());
        assert!(label_record.properties.contains(&Property::Standalone(true)));

        let edit_record = driver.record(edit.control().handle().unwrap()).unwrap();
        assert!(edit_record.properties.contains(&Property::Password(true)));
        assert!(edit_record.is_connected());
    });
}

#[test]
fn content_setters_reach_the_native_widget() {
    with_runtime(|driver| {
        let button = Button::new("Start");
        let progress = ProgressBar::new();
        let stack = Stack::vertical([button.clone().into(), progress.clone().into()]);
        Window::new("Work", 100, 50, stack).open();

        button.set_text("Stop");
        progress.set_value(40);

        assert_eq!(
            driver.text(button.control().handle().unwrap()).as_deref(),
            Some("Stop")
        );
        let record = driver.record(progress.control().handle().unwrap()).unwrap();
        assert_eq!(record.properties.last(), Some(&Property::Progress(40)));
    });
}

#[test]
fn rerouted_signal_receives_clicks() {
    with_runtime(|driver| {
        let shared = Signal::new();
        let ok = Button::new("OK");
        let cancel = Button::new("Cancel");
        ok.set_clicked_signal(shared.clone());
        cancel.set_clicked_signal(shared.clone());
        let stack = Stack::horizontal([ok.clone().into(), cancel.clone().into()]);
        Window::new("Choose", 100, 30, stack).open();

        driver.click(cancel.control().handle().unwrap());
        assert_eq!(shared.try_recv(), Some(()));
        assert_eq!(ok.clicked(), shared);
    });
}

#[test]
#[should_panic(expected = "set_clicked_signal cannot change a control")]
fn rerouting_after_creation_panics() {
    with_runtime(|_| {
        let button = Button::new("OK");
        Window::new("w", 10, 10, button.clone()).create();
        button.set_clicked_signal(Signal::new());
    });
}

#[test]
fn user_input_updates_controls() {
    with_runtime(|driver| {
        let checkbox = Checkbox::new("Agree");
        let edit = LineEdit::new();
        let combo = Combobox::new(["small", "large"]);
        let list = Listbox::multi(["a", "b", "c"]);
        let stack = Stack::vertical([
            checkbox.clone().into(),
            edit.clone().into(),
            combo.clone().into(),
            list.clone().into(),
        ]);
        Window::new("Form", 200, 200, stack).open();

        driver.notify(checkbox.control().handle().unwrap(), Notification::Toggled(true));
        driver.notify(
            edit.control().handle().unwrap(),
            Notification::TextChanged("hello".into()),
        );
        driver.notify(
            combo.control().handle().unwrap(),
            Notification::SelectionChanged(vec![1]),
        );
        driver.notify(
            list.control().handle().unwrap(),
            Notification::SelectionChanged(vec![2, 0]),
        );

        assert!(checkbox.is_checked());
        assert_eq!(checkbox.toggled().try_recv(), Some(true));
        assert_eq!(edit.text(), "hello");
        assert_eq!(edit.changed().try_recv().as_deref(), Some("hello"));
        assert_eq!(combo.selected(), Some(1));
        assert_eq!(combo.text(), "large");
        assert_eq!(list.selection(), [0, 2]);
    });
}

#[test]
fn list_edits_after_creation_are_pushed() {
    with_runtime(|driver| {
        let list = Listbox::new(["one", "two"]);
        Window::new("List", 100, 100, list.clone()).open();

        list.append("three");
        list.delete(0);

        let record = driver.record(list.control().handle().unwrap()).unwrap();
        let items = record.properties.iter().rev().find_map(|property| match property {
            Property::Items(items) => Some(items.clone()),
            _ => None,
        });
        assert_eq!(items, Some(vec!["two".to_string(), "three".to_string()]));
    });
}

#[test]
fn window_lifecycle() {
    with_runtime(|driver| {
        let window = Window::new("Main", 120, 90, sized_control(10, 10));
        assert!(!window.is_created());

        window.create();
        let handle = window.handle().unwrap();
        assert!(window.is_created());
        assert!(!window.is_visible());

        window.show();
        assert!(window.is_visible());
        assert!(driver.record(handle).unwrap().is_visible());

        window.hide();
        assert!(!window.is_visible());
        assert!(!driver.record(handle).unwrap().is_visible());

        window.set_title("Renamed");
        assert_eq!(driver.text(handle).as_deref(), Some("Renamed"));

        driver.close(handle);
        assert_eq!(window.closing().try_recv(), Some(()));
        assert!(window.is_created(), "closing requests never destroy the window");

        window.destroy();
        assert!(driver.widgets().is_empty());
        assert!(!window.is_created());
    });
}

#[test]
#[should_panic(expected = "Window::create called on a window that is Hidden")]
fn creating_twice_panics() {
    with_runtime(|_| {
        let window = Window::new("twice", 10, 10, sized_control(1, 1));
        window.create();
        window.create();
    });
}

#[test]
fn notifications_for_destroyed_windows_are_dropped() {
    with_runtime(|driver| {
        let button = Button::new("gone");
        let window = Window::new("gone", 10, 10, button.clone());
        window.open();
        let handle = button.control().handle().unwrap();

        window.destroy();
        driver.click(handle);

        assert!(!button.clicked().has_value());
    });
}
