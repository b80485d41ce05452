// Scene-level properties that must hold for every built-in variant

use vmscene::memory::search::{run_search, SearchFixture, Verdict};
use vmscene::memory::CellRef;
use vmscene::registry::{Registry, RegistrySchema};
use vmscene::scene::config::{SceneConfig, SceneName, TerminationMode};
use vmscene::scene::constants::SNAPSHOT_LIMIT;
use vmscene::scene::layout::PanelId;
use vmscene::scene::phase::Phase;
use vmscene::scene::state::{MarkerSlot, NoteSlot};
use vmscene::scene::Scene;
use vmscene::timeline::player::Player;

fn played(name: SceneName) -> (Scene, Player) {
    let scene = Scene::build(SceneConfig::preset(name)).expect("scene should build");
    let player = scene.player(SNAPSHOT_LIMIT).expect("scene should play");
    (scene, player)
}

/// Position of the first snapshot in `phase`
fn first_in_phase(player: &Player, phase: Phase) -> Option<usize> {
    (0..player.total_snapshots())
        .find(|&i| player.snapshot(i).is_some_and(|s| s.state.phase == phase))
}

#[test]
fn test_every_preset_plays_to_termination() {
    for name in SceneName::ALL {
        let (_, mut player) = played(name);
        assert!(player.total_snapshots() > 10, "{}", name);
        player.jump_to_end().unwrap();
        assert_eq!(player.state().phase, Phase::ProcessTerminated, "{}", name);
    }
}

#[test]
fn test_panel_and_column_counts_are_fixed() {
    for name in SceneName::ALL {
        let (scene, player) = played(name);
        assert_eq!(scene.layout.panels().len(), PanelId::COUNT);

        let columns = scene.config.registry_schema.columns().len();
        for i in 0..player.total_snapshots() {
            let state = &player.snapshot(i).unwrap().state;
            assert_eq!(state.registry().column_count(), columns, "{} @ {}", name, i);
        }
    }
}

#[test]
fn test_registry_append_then_remove_all_is_empty() {
    for schema in [RegistrySchema::Legacy, RegistrySchema::Vad] {
        let mut registry = Registry::new(schema);
        let handles: Vec<_> = (0..6u64)
            .map(|n| {
                let start = 0x1000 * n;
                registry
                    .append_row(schema.record("PID 1", start, start + 0x1000, "Reserved"))
                    .unwrap()
            })
            .collect();
        assert_eq!(registry.len(), 6);
        for handle in handles.into_iter().rev() {
            registry.remove_row(handle).unwrap();
        }
        assert!(registry.is_empty());
    }
}

#[test]
fn test_search_ignores_the_byte_labels() {
    let config = SceneConfig::default();
    let outcome = run_search(&config.heap.cells(), &SearchFixture::default()).unwrap();
    assert_eq!(outcome.accepted, 2);
    assert_eq!(outcome.rejected(), vec![0, 1]);
    assert_eq!(
        outcome.visited,
        vec![(0, Verdict::Rejected), (1, Verdict::Rejected), (2, Verdict::Accepted)]
    );

    // "4078 bytes used" is nearly full, yet the fixture decides
    let last = run_search(&config.heap.cells(), &SearchFixture::accept_at(4)).unwrap();
    assert_eq!(last.accepted, 4);
    assert_eq!(last.rejected(), vec![0, 1, 2, 3]);
}

#[test]
fn test_reserved_cell_is_restored_after_free() {
    for name in SceneName::ALL {
        let (scene, player) = played(name);
        let cell = CellRef::heap(scene.search.accepted);
        let initial = scene.initial_state().cell(cell).unwrap().content.clone();
        assert_eq!(initial, "[used 0 bytes]");

        let written = first_in_phase(&player, Phase::ValueWritten).unwrap();
        assert_eq!(
            player.snapshot(written).unwrap().state.cell(cell).unwrap().content,
            scene.config.written_value
        );

        let freed = first_in_phase(&player, Phase::BlockFreed).unwrap();
        let after_free = &player.snapshot(freed).unwrap().state;
        assert_eq!(after_free.cell(cell).unwrap().content, initial, "{}", name);
    }
}

#[test]
fn test_termination_clears_registry_and_pointer() {
    for name in SceneName::ALL {
        let (scene, mut player) = played(name);
        let pointer = CellRef::stack(scene.config.stack.pointer_index);

        let reserved = first_in_phase(&player, Phase::BlockReserved).unwrap();
        let peak = (reserved..player.total_snapshots())
            .map(|i| player.snapshot(i).unwrap().state.registry().len())
            .max()
            .unwrap();
        assert_eq!(peak, 1, "{}", name);

        let filled = (0..player.total_snapshots())
            .filter_map(|i| player.snapshot(i))
            .any(|s| s.state.cell(pointer).unwrap().content == "ptr=0x55a13000");
        assert!(filled, "{}: pointer slot never received the address", name);

        player.jump_to_end().unwrap();
        let state = player.state();
        assert!(state.registry().is_empty(), "{}", name);
        assert!(state.cell(pointer).unwrap().is_pristine(), "{}", name);
        assert_eq!(state.cell(pointer).unwrap().content, "0x00000000");
    }
}

#[test]
fn test_crash_clears_every_transient_marker() {
    let (scene, mut player) = played(SceneName::CrashCleanup);
    assert_eq!(scene.config.termination, TerminationMode::TerminateProcess);

    player.jump_to_end().unwrap();
    let state = player.state();
    for slot in [
        MarkerSlot::CodeFocus,
        MarkerSlot::ApiFocus,
        MarkerSlot::SearchPointer,
        MarkerSlot::BlockOutline,
        MarkerSlot::Lock,
    ] {
        assert!(state.marker(slot).is_none(), "{:?} left behind", slot);
    }
    assert!(state.connectors().is_empty());
    assert!(state.note(NoteSlot::Crash).is_none());
    assert!(state.note(NoteSlot::Termination).is_some());
    assert!(!state.is_panel_visible(PanelId::Code));
    assert!(!state.is_panel_visible(PanelId::Disassembly));
}

#[test]
fn test_clock_ticks_once_per_visited_cell() {
    let (scene, mut player) = played(SceneName::HeapBasics);
    player.jump_to_end().unwrap();
    assert_eq!(player.state().clock_ticks as usize, scene.search.visited.len());
}

#[test]
fn test_vad_rows_use_page_numbers() {
    let (_, player) = played(SceneName::VadRegistry);
    let reserved = first_in_phase(&player, Phase::BlockReserved).unwrap();
    let with_row = (reserved..player.total_snapshots())
        .filter_map(|i| player.snapshot(i))
        .find(|s| !s.state.registry().is_empty())
        .unwrap();
    assert_eq!(
        with_row.state.registry().rows()[0].fields,
        vec!["PID 1234", "0x55a13", "0x55a13", "RW", "Private"]
    );
}
