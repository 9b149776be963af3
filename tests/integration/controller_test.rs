//! Controller scenarios against a player with controllable seek timing

use loopmark::config::ResumePolicy;
use loopmark::playback::MarkToggle;
use loopmark::store::MarkStore;
use loopmark::Config;

use super::helpers::{controller, controller_with_config, settle, video};

fn assert_marks_well_formed(marks: &[f64], tolerance: f64) {
    for pair in marks.windows(2) {
        assert!(pair[0] < pair[1], "marks not ascending: {:?}", marks);
        assert!(pair[1] - pair[0] > tolerance, "marks too close: {:?}", marks);
    }
}

#[test]
fn marks_stay_sorted_and_spaced_through_edits() {
    let tolerance = Config::default().marks.proximity_tolerance;
    let (mut c, player, _) = controller(&[], 0.0);

    for time in [50.0, 10.0, 70.0, 10.3, 40.0, 69.8, 25.0] {
        c.seek_to(time);
        settle(&mut c, &player, true);
        c.toggle_mark();
        assert_marks_well_formed(c.marks(), tolerance);
    }
    assert_eq!(c.marks(), &[25.0, 40.0, 50.0]);

    c.seek_to(40.0);
    settle(&mut c, &player, true);
    while c.finetune_mark_right(0.25).is_some() {
        settle(&mut c, &player, true);
        assert_marks_well_formed(c.marks(), tolerance);
    }
    // Stopped short of colliding with the mark at 50
    assert!(c.marks()[1] < 50.0 - tolerance);
}

#[test]
fn loop_needs_two_marks() {
    let (mut c, _, _) = controller(&[10.0], 50.0);
    assert_eq!(c.segment_count(), 0);
    assert!(!c.toggle_loop());
    assert!(!c.is_looping());
    assert!(!c.loop_timer_active());
}

#[test]
fn loop_entry_locates_segment() {
    let (mut c, player, _) = controller(&[10.0, 40.0, 70.0], 50.0);
    assert!(c.toggle_loop());
    assert_eq!(c.segment_index(), 1);
    assert_eq!(c.segment_bounds(), Some((40.0, 70.0)));
    assert_eq!(c.loop_time_remaining(), 30.0);
    assert!(c.loop_timer_active());
    // Already inside the segment
    assert!(player.seeks().is_empty());
}

#[test]
fn loop_entry_outside_segments_seeks_to_start() {
    let (mut c, player, _) = controller(&[10.0, 40.0, 70.0], 5.0);
    assert!(c.toggle_loop());
    assert_eq!(c.segment_index(), 0);
    assert_eq!(player.seeks(), vec![10.0]);
    settle(&mut c, &player, true);
    assert_eq!(c.current_time(), 10.0);
}

#[test]
fn second_seek_while_first_in_flight_is_dropped() {
    let (mut c, player, _) = controller(&[], 0.0);

    assert!(c.seek_to(20.0));
    assert!(!c.seek_to(60.0));
    assert_eq!(player.seeks(), vec![20.0]);

    settle(&mut c, &player, true);
    assert_eq!(c.current_time(), 20.0);
    assert!(c.poll_seek().is_none());
}

#[test]
fn stale_samples_are_ignored_while_seeking() {
    let (mut c, player, _) = controller(&[], 10.0);
    c.seek_to(60.0);
    c.on_tick(10.2, 0.1);
    assert_eq!(c.current_time(), 10.0);
    settle(&mut c, &player, true);
    assert_eq!(c.current_time(), 60.0);
}

#[test]
fn clear_marks_twice_is_the_same_empty_state() {
    let (mut c, _, store) = controller(&[10.0, 40.0, 70.0], 50.0);
    c.toggle_loop();

    assert!(c.clear_marks());
    let first = c.snapshot();
    assert!(c.clear_marks());
    assert_eq!(c.snapshot(), first);

    assert!(first.marks.is_empty());
    assert!(!first.is_looping);
    assert!(!first.loop_timer_active);
    assert_eq!(first.segment_index, 0);
    assert!(store.load(&video()).is_empty());
}

#[test]
fn boundary_overshoot_loops_back_without_advancing() {
    let (mut c, player, _) = controller(&[10.0, 40.0, 70.0], 50.0);
    c.toggle_loop();
    c.toggle_play_pause();

    c.on_tick(69.5, 0.5);
    assert!(player.seeks().is_empty());

    c.on_tick(70.5, 1.0);
    assert_eq!(player.seeks(), vec![40.0]);
    assert!(c.is_playing());

    settle(&mut c, &player, true);
    assert_eq!(c.current_time(), 40.0);
    assert_eq!(c.segment_index(), 1);
    assert!(c.is_playing());
}

#[test]
fn boundary_correction_is_debounced() {
    let (mut c, player, _) = controller(&[10.0, 40.0, 70.0], 50.0);
    c.toggle_loop();
    c.toggle_play_pause();

    c.on_tick(70.2, 0.1);
    settle(&mut c, &player, true);

    // Player still reports the old position once; too soon to correct again
    c.on_tick(70.3, 0.1);
    assert_eq!(player.seeks(), vec![40.0]);

    c.on_tick(70.4, 1.0);
    assert_eq!(player.seeks(), vec![40.0, 40.0]);
}

#[test]
fn loop_timer_expiry_on_last_segment_wraps_to_first() {
    let (mut c, player, _) = controller(&[10.0, 40.0, 70.0], 50.0);
    c.toggle_loop();
    c.toggle_play_pause();
    assert_eq!(c.segment_index(), c.segment_count() - 1);

    for step in 1..=29 {
        c.on_tick(50.0 + step as f64 * 0.5, 1.0);
    }
    assert!(player.seeks().is_empty());

    c.on_tick(65.0, 1.0);
    assert_eq!(c.segment_index(), 0);
    assert_eq!(c.loop_time_remaining(), 30.0);
    assert_eq!(player.seeks(), vec![10.0]);

    settle(&mut c, &player, true);
    assert_eq!(c.segment_bounds(), Some((10.0, 40.0)));
    assert!(c.is_playing());
}

#[test]
fn loop_timer_does_not_count_while_paused() {
    let (mut c, _, _) = controller(&[10.0, 40.0, 70.0], 50.0);
    c.toggle_loop();
    c.on_tick(50.0, 5.0);
    assert_eq!(c.loop_time_remaining(), 30.0);
}

#[test]
fn jump_to_next_mark_wraps_to_first() {
    let (mut c, player, _) = controller(&[10.0, 40.0, 70.0], 75.0);
    assert!(c.jump_to_next_mark());
    settle(&mut c, &player, true);
    assert_eq!(c.current_time(), 10.0);
}

#[test]
fn jump_to_previous_mark_wraps_to_last() {
    let (mut c, player, _) = controller(&[10.0, 40.0, 70.0], 5.0);
    assert!(c.jump_to_previous_mark());
    settle(&mut c, &player, true);
    assert_eq!(c.current_time(), 70.0);
}

#[test]
fn jump_skips_mark_under_playhead() {
    let (mut c, player, _) = controller(&[10.0, 40.0, 70.0], 40.05);
    c.jump_to_next_mark();
    settle(&mut c, &player, true);
    assert_eq!(c.current_time(), 70.0);
}

#[test]
fn jump_without_marks_does_nothing() {
    let (mut c, player, _) = controller(&[], 20.0);
    assert!(!c.jump_to_next_mark());
    assert!(player.seeks().is_empty());
}

#[test]
fn jump_stays_paused_outside_loop_by_default() {
    let (mut c, player, _) = controller(&[10.0, 40.0, 70.0], 20.0);
    c.toggle_play_pause();
    c.jump_to_next_mark();
    assert!(!player.state().playing);
    settle(&mut c, &player, true);
    assert!(!c.is_playing());
}

#[test]
fn jump_resumes_when_configured() {
    let mut config = Config::default();
    config.looping.resume_after_jump = ResumePolicy::Always;
    let (mut c, player, _) = controller_with_config(&[10.0, 40.0, 70.0], 20.0, &config);

    c.toggle_play_pause();
    c.jump_to_next_mark();
    settle(&mut c, &player, true);
    assert_eq!(c.current_time(), 40.0);
    assert!(c.is_playing());
    assert!(player.state().playing);
}

#[test]
fn segment_navigation_wraps_and_resumes_in_loop() {
    let (mut c, player, _) = controller(&[10.0, 40.0, 70.0], 50.0);
    c.toggle_loop();
    c.toggle_play_pause();

    assert!(c.next_segment());
    assert_eq!(c.segment_index(), 0);
    assert!(!c.is_playing());
    settle(&mut c, &player, true);
    assert_eq!(c.current_time(), 10.0);
    assert!(c.is_playing());

    assert!(c.jump_to_previous_mark());
    assert_eq!(c.segment_index(), 1);
    settle(&mut c, &player, true);
    assert_eq!(c.current_time(), 40.0);
}

#[test]
fn auto_pause_snaps_to_passed_mark() {
    let (mut c, player, _) = controller(&[10.0, 40.0], 39.9);
    c.toggle_play_pause();

    c.on_tick(40.1, 0.2);
    assert!(!c.is_playing());
    assert_eq!(player.seeks(), vec![40.0]);
    settle(&mut c, &player, true);
    assert_eq!(c.current_time(), 40.0);
    assert!(!c.is_playing());
}

#[test]
fn auto_pause_ignores_marks_passed_long_ago() {
    let (mut c, player, _) = controller(&[10.0, 40.0], 39.0);
    c.toggle_play_pause();

    c.on_tick(41.0, 2.0);
    assert!(c.is_playing());
    assert!(player.seeks().is_empty());
}

#[test]
fn auto_pause_can_be_disabled() {
    let mut config = Config::default();
    config.marks.pause_at_marks = false;
    let (mut c, player, _) = controller_with_config(&[40.0], 39.9, &config);
    c.toggle_play_pause();
    c.on_tick(40.1, 0.2);
    assert!(c.is_playing());
    assert!(player.seeks().is_empty());
}

#[test]
fn superseded_seek_leaves_position() {
    let (mut c, player, _) = controller(&[10.0, 40.0, 70.0], 50.0);
    c.toggle_loop();
    c.toggle_play_pause();
    c.next_segment();

    settle(&mut c, &player, false);
    assert_eq!(c.current_time(), 50.0);
    assert!(!c.is_seeking());
    assert!(!c.is_playing());
}

#[test]
fn finetune_moves_mark_persists_and_seeks() {
    let (mut c, player, store) = controller(&[10.0, 40.0], 40.0);

    assert_eq!(c.finetune_mark_left(0.5), Some(39.5));
    assert_eq!(store.load(&video()), vec![10.0, 39.5]);
    assert_eq!(player.seeks(), vec![39.5]);
    settle(&mut c, &player, true);
    assert_eq!(c.current_time(), 39.5);

    // Nothing near the playhead
    c.seek_to(25.0);
    settle(&mut c, &player, true);
    assert_eq!(c.finetune_mark_right(0.5), None);
}

#[test]
fn toggle_mark_round_trips_through_store() {
    let (mut c, _, store) = controller(&[], 33.0);
    assert_eq!(c.toggle_mark(), Some(MarkToggle::Added(33.0)));
    assert_eq!(store.load(&video()), vec![33.0]);
    assert_eq!(c.toggle_mark(), Some(MarkToggle::Removed(33.0)));
    assert!(store.load(&video()).is_empty());
}

#[test]
fn session_timer_runs_independently_of_loop() {
    let (mut c, _, _) = controller(&[], 0.0);
    c.start_timer();
    c.on_tick(0.0, 1.5);
    c.on_tick(0.0, 1.0);
    assert!(c.session_timer().is_running());
    assert_eq!(c.session_timer().elapsed(), 2.5);

    c.start_timer();
    assert_eq!(c.session_timer().elapsed(), 0.0);
}

#[test]
fn unusable_duration_blocks_loop() {
    let (mut c, _, _) = controller(&[10.0, 40.0], 20.0);
    c.set_duration(f64::NAN);
    assert_eq!(c.duration(), 0.0);
    assert!(!c.toggle_loop());
}
