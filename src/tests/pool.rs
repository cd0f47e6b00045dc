use crate::{ItemPool, PooledView, Recycled, Retired, ViewType};

#[test]
fn obtain_prefers_exact_origin_then_most_recent() {
    let mut pool: ItemPool<&str> = ItemPool::new();
    pool.set_view_type_count(2);
    assert_eq!(pool.retire(PooledView::new("a", ViewType::Typed(0), 0), 3), Retired::Pooled);
    assert_eq!(pool.retire(PooledView::new("b", ViewType::Typed(0), 0), 7), Retired::Pooled);
    assert_eq!(pool.retire(PooledView::new("c", ViewType::Typed(1), 0), 7), Retired::Pooled);

    let exact = pool.obtain(3, ViewType::Typed(0)).map(Recycled::into_inner);
    assert_eq!(exact.map(|p| (p.view, p.origin_index)), Some(("a", 3)));

    let any = pool.obtain(9, ViewType::Typed(0));
    assert!(matches!(any, Some(Recycled::Scrap(ref p)) if p.view == "b" && p.origin_index == 7));

    assert_eq!(pool.obtain(9, ViewType::Typed(0)), None);
    assert_eq!(pool.scrap_len_of(ViewType::Typed(1)), 1);
}

#[test]
fn active_views_return_to_their_own_index() {
    let mut pool: ItemPool<&str> = ItemPool::new();
    pool.fill_active(
        10,
        ["x", "y", "z"]
            .into_iter()
            .enumerate()
            .map(|(i, v)| PooledView::new(v, ViewType::Typed(0), 10 + i)),
    );
    assert_eq!(pool.active_len(), 3);

    let got = pool.obtain(11, ViewType::Typed(0));
    assert!(got.as_ref().is_some_and(Recycled::is_active));
    assert_eq!(got.map(|r| r.into_inner().view), Some("y"));

    // Index 11's slot is consumed; the scrap list is still empty.
    assert_eq!(pool.obtain(11, ViewType::Typed(0)), None);

    pool.scrap_active();
    assert_eq!(pool.active_len(), 0);
    assert_eq!(pool.scrap_len(), 2);
}

#[test]
fn active_view_of_other_type_goes_to_scrap() {
    let mut pool: ItemPool<&str> = ItemPool::new();
    pool.set_view_type_count(2);
    pool.fill_active(0, [PooledView::new("old", ViewType::Typed(1), 0)]);

    assert_eq!(pool.obtain(0, ViewType::Typed(0)), None);
    assert_eq!(pool.scrap_len_of(ViewType::Typed(1)), 1);
    let reused = pool.obtain(5, ViewType::Typed(1)).map(Recycled::into_inner);
    assert_eq!(reused.map(|p| p.view), Some("old"));
}

#[test]
fn decorations_and_live_state_bypass_scrap() {
    let mut pool: ItemPool<&str> = ItemPool::new();
    assert_eq!(pool.retire(PooledView::new("header", ViewType::HeaderOrFooter, 0), 0), Retired::Dropped);
    assert_eq!(pool.retire(PooledView::new("raw", ViewType::Ignore, 0), 1), Retired::Dropped);
    assert_eq!(pool.retire(PooledView::new("far", ViewType::Typed(4), 0), 2), Retired::Dropped);

    let live = PooledView::new("focused", ViewType::Typed(0), 0).with_live_state(true);
    assert_eq!(pool.retire(live, 5), Retired::Parked);
    assert_eq!(pool.live_len(), 1);
    assert_eq!(pool.scrap_len(), 0);
    assert_eq!(pool.obtain(5, ViewType::Typed(0)), None);

    let parked = pool.take_live_state_view(5);
    assert_eq!(parked.map(|p| p.view), Some("focused"));
    assert!(pool.is_empty());
}

#[test]
fn ended_live_state_is_released() {
    let mut pool: ItemPool<&str> = ItemPool::new();
    pool.retire(PooledView::new("a", ViewType::Typed(0), 0).with_live_state(true), 1);
    pool.retire(PooledView::new("b", ViewType::Typed(0), 0).with_live_state(true), 2);
    pool.release_ended_live_state(|v| *v == "b");
    assert_eq!(pool.live_len(), 1);
    assert!(pool.take_live_state_view(2).is_some());
}

#[test]
fn prune_drops_oldest_views() {
    let mut pool: ItemPool<usize> = ItemPool::new();
    for i in 0..10 {
        pool.retire(PooledView::new(i, ViewType::Typed(0), 0), i);
    }
    pool.prune(3);
    assert_eq!(pool.scrap_len(), 3);
    let mut left: Vec<usize> = (0..3)
        .filter_map(|_| pool.obtain(100, ViewType::Typed(0)))
        .map(|r| r.into_inner().view)
        .collect();
    left.sort_unstable();
    assert_eq!(left, vec![7, 8, 9]);
}

#[test]
fn discard_forgets_views_of_removed_index() {
    let mut pool: ItemPool<&str> = ItemPool::new();
    pool.retire(PooledView::new("a", ViewType::Typed(0), 0), 4);
    pool.retire(PooledView::new("b", ViewType::Typed(0), 0), 5);
    pool.retire(PooledView::new("c", ViewType::Typed(0), 0).with_live_state(true), 4);

    assert_eq!(pool.discard(4, ViewType::Typed(0)), 2);
    assert_eq!(pool.scrap_len(), 1);
    assert_eq!(pool.live_len(), 0);
    assert_eq!(pool.discard(4, ViewType::Typed(0)), 0);
}

#[test]
fn zero_view_types_fall_back_to_one() {
    let mut pool: ItemPool<&str> = ItemPool::new();
    pool.set_view_type_count(0);
    assert_eq!(pool.view_type_count(), 1);
    assert_eq!(pool.retire(PooledView::new("a", ViewType::Typed(0), 0), 0), Retired::Pooled);
}

#[test]
fn clear_drops_everything() {
    let mut pool: ItemPool<&str> = ItemPool::new();
    pool.fill_active(0, [PooledView::new("a", ViewType::Typed(0), 0)]);
    pool.retire(PooledView::new("b", ViewType::Typed(0), 0), 1);
    pool.retire(PooledView::new("c", ViewType::Typed(0), 0).with_live_state(true), 2);
    pool.clear();
    assert!(pool.is_empty());
    assert_eq!(pool.view_type_count(), 1);
}
