// Example: a headless flick, fling and spring-back over a horizontal card strip.
use hlistview::{
    ChoiceMode, HorizontalList, ItemProvider, ListOptions, MeasureConstraints, PointerEvent, Rect,
    StableId,
};

struct Cards {
    widths: Vec<u32>,
    binds: usize,
    rebinds: usize,
}

impl ItemProvider for Cards {
    type View = String;

    fn count(&self) -> usize {
        self.widths.len()
    }

    fn has_stable_ids(&self) -> bool {
        true
    }

    fn id_for(&self, index: usize) -> Option<StableId> {
        Some(5_000 + index as u64)
    }

    fn bind(&mut self, index: usize, recycled: Option<String>) -> String {
        self.binds += 1;
        if recycled.is_some() {
            self.rebinds += 1;
        }
        let mut view = recycled.unwrap_or_default();
        view.clear();
        view.push_str(&format!("card #{index}"));
        view
    }

    fn measure(&mut self, index: usize, _view: &String, _constraints: MeasureConstraints) -> u32 {
        self.widths[index]
    }
}

fn main() {
    // Mixed widths: every third card is wide.
    let widths = (0..200).map(|i| if i % 3 == 0 { 180 } else { 120 }).collect();
    let cards = Cards {
        widths,
        binds: 0,
        rebinds: 0,
    };
    let options = ListOptions::new(Rect { main: 720, cross: 160 })
        .with_gap(8)
        .with_overscroll(64, 0.5)
        .with_overfling_distance(48)
        .with_on_event(Some(|event: &hlistview::ListEvent| {
            if let hlistview::ListEvent::ItemClick { index, .. } = event {
                println!("click on {index}");
            }
            false
        }));
    let mut list = HorizontalList::headless(cards, options);
    list.set_choice_mode(ChoiceMode::Single);

    // A quick flick to the left: 300 px in 48 ms.
    let mut now_ms = 0u64;
    let mut x = 600.0f32;
    list.on_pointer_event(PointerEvent::down(x, now_ms));
    for _ in 0..6 {
        now_ms += 8;
        x -= 50.0;
        list.on_pointer_event(PointerEvent::moved(x, now_ms));
    }
    list.on_pointer_event(PointerEvent::up(x, now_ms));
    println!(
        "released: state={:?} off={} first={:?}",
        list.motion_state(),
        list.scroll_offset(),
        list.first_visible_index()
    );

    let mut frame = 0u64;
    while list.on_tick(now_ms) {
        now_ms += 16;
        frame += 1;
        if frame % 8 == 0 {
            println!(
                "t={now_ms}ms state={:?} off={} overscroll={} window={:?}..={:?}",
                list.motion_state(),
                list.scroll_offset(),
                list.overscroll_offset(),
                list.window().first_index(),
                list.window().last_index(),
            );
        }
    }

    // Jump near the end and fling past it to watch the overfling and spring-back.
    list.set_selection_from_left(190, 0);
    list.fling(-6_000.0, now_ms);
    let mut peak = 0;
    while list.on_tick(now_ms) {
        now_ms += 16;
        peak = peak.max(list.overscroll_offset());
    }
    println!(
        "edge: peak overscroll={peak} final off={} last={:?}",
        list.scroll_offset(),
        list.last_visible_index()
    );

    // Tap the first visible card to check it.
    list.on_pointer_event(PointerEvent::down(30.0, now_ms));
    list.on_pointer_event(PointerEvent::up(30.0, now_ms + 40));
    println!("checked={:?}", list.checked_item_position());

    let cards = list.provider();
    println!(
        "done: binds={} rebinds={} pooled={}",
        cards.binds,
        cards.rebinds,
        list.pool().len()
    );
}
