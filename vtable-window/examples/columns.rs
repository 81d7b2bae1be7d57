// Example: horizontal windowing over scrollable columns with frozen edges as padding.
use vtable_window::{WindowOptions, Windowing};

fn main() {
    let widths: Vec<u32> = (0..200).map(|i| 80 + (i % 5) * 40).collect();
    let frozen_left = 120;
    let frozen_right = 60;

    let owned = widths.clone();
    let mut w = Windowing::new(
        WindowOptions::horizontal(widths.len(), move |i| owned[i])
            .with_overscan(2)
            .with_padding(frozen_left, frozen_right),
    );
    w.set_viewport_and_scroll(1024, 0);
    println!("total_width={}", w.total_size());
    for it in w.window().iter() {
        println!("col={} start={} width={}", it.index, it.start, it.size);
    }

    // A user drags column 3 wider; only prefix sums after it shift.
    let delta = w.resize_item(3, 400);
    println!("resized col 3: delta={delta} total_width={}", w.total_size());

    w.set_scroll_offset_clamped(5_000);
    let win = w.window();
    println!("at offset=5000: range={:?} span={:?}", win.range, win.span());
}
