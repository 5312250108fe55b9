//! Pieces tests - shapes, spawn origin and SRS rotation through the resolver

use tetraj::core::resolver::{drop_distance, fits, try_rotate, try_shift};
use tetraj::core::{get_kicks, get_shape, spawn_origin, Board, Piece};
use tetraj::types::{PieceKind, RotateDirection, Rotation};

// ============== Shape Tests ==============

#[test]
fn test_i_piece_shapes() {
    assert_eq!(get_shape(PieceKind::I, Rotation::North), [(0, 1), (1, 1), (2, 1), (3, 1)]);
    assert_eq!(get_shape(PieceKind::I, Rotation::East), [(2, 0), (2, 1), (2, 2), (2, 3)]);
    assert_eq!(get_shape(PieceKind::I, Rotation::South), [(0, 2), (1, 2), (2, 2), (3, 2)]);
    assert_eq!(get_shape(PieceKind::I, Rotation::West), [(1, 0), (1, 1), (1, 2), (1, 3)]);
}

#[test]
fn test_o_piece_shapes() {
    let north = get_shape(PieceKind::O, Rotation::North);
    assert_eq!(north, [(1, 0), (2, 0), (1, 1), (2, 1)]);
    for r in [Rotation::East, Rotation::South, Rotation::West] {
        assert_eq!(get_shape(PieceKind::O, r), north);
    }
}

#[test]
fn test_t_piece_shapes() {
    assert_eq!(get_shape(PieceKind::T, Rotation::North), [(1, 0), (0, 1), (1, 1), (2, 1)]);
    assert_eq!(get_shape(PieceKind::T, Rotation::South), [(0, 1), (1, 1), (2, 1), (1, 2)]);
}

#[test]
fn test_spawn_origin_centers_the_box() {
    assert_eq!(spawn_origin(10, 4), (3, 2));
    assert_eq!(spawn_origin(7, 4), (1, 2));
    assert_eq!(spawn_origin(12, 6), (4, 4));
}

#[test]
fn test_spawned_minos_sit_in_the_buffer() {
    let board = Board::standard();
    let (x, y) = spawn_origin(board.width(), board.buffer());
    for kind in PieceKind::ALL {
        let piece = Piece::new(kind, x, y);
        assert!(fits(&board, &piece));
        assert!(piece.cells().iter().all(|&(_, cy)| cy < board.buffer() as i8));
    }
}

// ============== SRS Rotation Tests ==============

#[test]
fn test_t_rotation_on_empty_board_is_unkicked() {
    let board = Board::standard();
    let piece = Piece::new(PieceKind::T, 3, 5);
    let (rotated, kick) = try_rotate(&board, &piece, RotateDirection::Clockwise).unwrap();
    assert_eq!(rotated.rotation, Rotation::East);
    assert_eq!((rotated.x, rotated.y), (3, 5));
    assert_eq!(kick, 0);
}

#[test]
fn test_t_rotation_with_kick() {
    // East at (3,5) would cover (4,7); block it so the first kick (-1, 0) wins
    let mut board = Board::standard();
    board.set(4, 7, Some(PieceKind::O));
    let piece = Piece::new(PieceKind::T, 3, 5);

    let (rotated, kick) = try_rotate(&board, &piece, RotateDirection::Clockwise).unwrap();
    assert_eq!(kick, 1);
    assert_eq!(rotated.rotation, Rotation::East);
    assert_eq!((rotated.x, rotated.y), (2, 5));
}

#[test]
fn test_t_rotation_failure_leaves_piece() {
    // Everything is filled except the T's own cells
    let mut board = Board::standard();
    for y in 0..board.total_rows() as i8 {
        let gaps: &[i8] = match y {
            0 => &[4],
            1 => &[3, 4, 5],
            _ => &[],
        };
        board.fill_row_except(y, gaps, PieceKind::Z);
    }
    let piece = Piece::new(PieceKind::T, 3, 0);
    assert!(fits(&board, &piece));
    assert!(try_rotate(&board, &piece, RotateDirection::Clockwise).is_none());
    assert!(try_rotate(&board, &piece, RotateDirection::CounterClockwise).is_none());
}

#[test]
fn test_o_rotation_never_moves() {
    let board = Board::standard();
    let piece = Piece::new(PieceKind::O, 3, 5);
    let (rotated, kick) = try_rotate(&board, &piece, RotateDirection::CounterClockwise).unwrap();
    assert_eq!(kick, 0);
    assert_eq!(rotated.cells(), piece.cells());
}

#[test]
fn test_i_rotation_against_left_wall_kicks_right() {
    // West I hugging the wall: North at x=-1 would poke out of the grid
    let board = Board::standard();
    let piece = Piece {
        kind: PieceKind::I,
        rotation: Rotation::West,
        x: -1,
        y: 10,
    };
    assert!(fits(&board, &piece));

    let (rotated, kick) = try_rotate(&board, &piece, RotateDirection::Clockwise).unwrap();
    assert_eq!(rotated.rotation, Rotation::North);
    assert!(kick > 0);
    assert!(fits(&board, &rotated));
}

#[test]
fn test_four_rotations_round_trip() {
    let board = Board::standard();
    for kind in PieceKind::ALL {
        for dir in [RotateDirection::Clockwise, RotateDirection::CounterClockwise] {
            let start = Piece::new(kind, 3, 10);
            let mut piece = start;
            for _ in 0..4 {
                piece = try_rotate(&board, &piece, dir).unwrap().0;
            }
            assert_eq!(piece, start, "{kind:?} {dir:?}");
        }
    }
}

#[test]
fn test_kick_table_consistency() {
    for r in 0..4 {
        let from = Rotation::from_index(r);
        for dir in [RotateDirection::Clockwise, RotateDirection::CounterClockwise] {
            assert!(get_kicks(PieceKind::O, from, dir).iter().all(|&k| k == (0, 0)));
            // S shares the JLSTZ table with T
            assert_eq!(get_kicks(PieceKind::S, from, dir), get_kicks(PieceKind::T, from, dir));
        }
    }
    assert_ne!(
        get_kicks(PieceKind::I, Rotation::North, RotateDirection::Clockwise),
        get_kicks(PieceKind::T, Rotation::North, RotateDirection::Clockwise)
    );
}

// ============== Movement ==============

#[test]
fn test_shift_stops_at_walls() {
    let board = Board::standard();
    let mut piece = Piece::new(PieceKind::O, 3, 10);
    let mut steps = 0;
    while let Some(moved) = try_shift(&board, &piece, -1, 0) {
        piece = moved;
        steps += 1;
    }
    assert_eq!(steps, 4);
    assert_eq!(piece.x, -1);
}

#[test]
fn test_drop_distance_lands_on_stack() {
    let mut board = Board::standard();
    board.fill_row_except(23, &[], PieceKind::J);
    let piece = Piece::new(PieceKind::I, 3, 2);
    // North I covers row y+1; resting row is 22
    assert_eq!(drop_distance(&board, &piece), 19);
}
