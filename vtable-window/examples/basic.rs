// Example: a million fixed-height rows, then jump to the last one.
use vtable_window::{Align, WindowOptions, Windowing};

fn main() {
    let mut w = Windowing::new(WindowOptions::new(1_000_000, |_| 28).with_overscan(20));
    w.set_viewport_and_scroll(600, 28 * 123_456);

    let win = w.window();
    println!("total_size={}", w.total_size());
    println!("visible={:?} overscanned={:?}", win.visible, win.range);
    println!("first_item={:?}", win.items.first());

    let off = w.scroll_to_index(999_999, Align::End);
    println!("after scroll_to_index: offset={off} range={:?}", w.virtual_range());
}
