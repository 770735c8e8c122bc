//! Property tests over random move sequences.
//!
//! Arbitrary cell sequences are fed to a two-human session, so most inputs
//! are illegal. After every submission the live-mark invariant, the
//! no-mutation-on-rejection rule and win detection are checked.

use proptest::prelude::*;

use vanishing_ttt::rules::{all_winning_lines, check_winner};
use vanishing_ttt::{MoveError, PlayerId, Session, SessionConfig, MAX_LIVE_MARKS};

fn cells() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..10, 0..80)
}

proptest! {
    #[test]
    fn prop_history_matches_live_marks(seq in cells(), seed in any::<u64>()) {
        let mut session = Session::start(SessionConfig::new(), seed).unwrap();

        for cell in seq {
            let _ = session.submit_move(cell);

            let state = session.state();
            prop_assert!(state.check_invariants().is_ok(), "{:?}", state.check_invariants());
            for player in PlayerId::ALL {
                prop_assert!(state.board().count_owned(player) <= MAX_LIVE_MARKS);
                prop_assert_eq!(state.history(player).len(), state.board().count_owned(player));
            }
        }
    }

    #[test]
    fn prop_rejected_moves_leave_state_untouched(seq in cells()) {
        let mut session = Session::start(SessionConfig::new(), 0).unwrap();

        for cell in seq {
            let before = session.state().clone();
            if session.submit_move(cell).is_err() {
                prop_assert_eq!(session.state(), &before);
            }
        }
    }

    #[test]
    fn prop_oldest_cell_always_rejected(seq in cells()) {
        let mut session = Session::start(SessionConfig::new(), 0).unwrap();

        for cell in seq {
            let _ = session.submit_move(cell);
            if session.state().is_terminal() {
                break;
            }

            let active = session.state().active_player();
            if let Some(oldest) = session.state().history(active).pending_eviction() {
                let before = session.state().clone();
                prop_assert_eq!(
                    session.submit_move(oldest.get()),
                    Err(MoveError::VacatingCell(oldest))
                );
                prop_assert_eq!(session.state(), &before);
            }
        }
    }

    #[test]
    fn prop_terminal_iff_line_owned(seq in cells()) {
        let mut session = Session::start(SessionConfig::new(), 0).unwrap();

        for cell in seq {
            let _ = session.submit_move(cell);
            let state = session.state();
            let lines = all_winning_lines(state.board());

            // At most six live marks, so a full board never happens.
            prop_assert_eq!(state.is_terminal(), check_winner(state.board()).is_some());
            prop_assert!(lines.iter().all(|l| l.winner == lines[0].winner));
            if let Some(line) = lines.first() {
                prop_assert_eq!(state.outcome().and_then(|o| o.winner()), Some(line.winner));
            }
        }
    }
}
