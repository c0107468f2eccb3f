/// Adlerticker — Game Selector
///
/// Classifies the season's flat game list into the three slots the ticker
/// tracks: most recent FINAL game, first running game, soonest FUTURE game.
/// Pure — same list in, same slots out, no I/O.
///
/// The live-status token is a parameter because feed variants disagree
/// ("RUNNING" vs "LIVE"); FINAL and FUTURE are stable across variants.

use game_api::Game;

pub const STATUS_FINAL: &str = "FINAL";
pub const STATUS_FUTURE: &str = "FUTURE";

#[derive(Debug, Clone, Default)]
pub struct SelectedGames {
    pub last_game:    Option<Game>,
    pub current_game: Option<Game>,
    pub next_game:    Option<Game>,
}

/// Pick (last, current, next) from the list.
///
/// Ordering is lexicographic on the raw `matchstart` string, which is
/// correct for ISO-8601. Tie-breaks and missing timestamps:
///   - last_game:  later list entry wins ties; a FINAL game without a
///     matchstart never beats one that has it
///   - current_game: first entry with the live status, in list order
///   - next_game:  earlier list entry wins ties; a FUTURE game without a
///     matchstart never preempts a scheduled one
pub fn select_games(games: &[Game], live_status: &str) -> SelectedGames {
    let mut last: Option<&Game> = None;
    let mut current: Option<&Game> = None;
    let mut next: Option<&Game> = None;

    for game in games {
        let status = game.status.as_deref().unwrap_or("");
        if status == STATUS_FINAL {
            let newer = match last {
                None => true,
                Some(best) => start_of(game).unwrap_or("") >= start_of(best).unwrap_or(""),
            };
            if newer {
                last = Some(game);
            }
        } else if status == live_status {
            if current.is_none() {
                current = Some(game);
            }
        } else if status == STATUS_FUTURE {
            let sooner = match next {
                None => true,
                Some(best) => match (start_of(game), start_of(best)) {
                    (Some(a), Some(b)) => a < b,
                    (Some(_), None) => true,
                    (None, _) => false,
                },
            };
            if sooner {
                next = Some(game);
            }
        }
        // anything else (postponed, cancelled, garbage) lands in no slot
    }

    SelectedGames {
        last_game:    last.cloned(),
        current_game: current.cloned(),
        next_game:    next.cloned(),
    }
}

fn start_of(game: &Game) -> Option<&str> {
    game.matchstart.as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: u64, status: &str, start: Option<&str>) -> Game {
        Game {
            id: Some(game_api::GameId::Num(id)),
            status: Some(status.to_string()),
            matchstart: start.map(str::to_string),
            ..Game::default()
        }
    }

    fn id_of(slot: &Option<Game>) -> Option<u64> {
        match slot.as_ref()?.id.as_ref()? {
            game_api::GameId::Num(n) => Some(*n),
            game_api::GameId::Str(_) => None,
        }
    }

    #[test]
    fn test_selects_all_three_slots() {
        let games = vec![
            game(1, "FINAL", Some("2024-01-01T18:00:00")),
            game(2, "FINAL", Some("2024-01-05T18:00:00")),
            game(3, "RUNNING", Some("2024-01-08T19:30:00")),
            game(4, "FUTURE", Some("2024-02-01T18:00:00")),
            game(5, "FUTURE", Some("2024-01-12T18:00:00")),
        ];
        let selected = select_games(&games, "RUNNING");
        assert_eq!(id_of(&selected.last_game), Some(2));
        assert_eq!(id_of(&selected.current_game), Some(3));
        assert_eq!(id_of(&selected.next_game), Some(5));
    }

    #[test]
    fn test_empty_buckets_stay_empty() {
        let selected = select_games(&[], "RUNNING");
        assert!(selected.last_game.is_none());
        assert!(selected.current_game.is_none());
        assert!(selected.next_game.is_none());

        let games = vec![game(1, "POSTPONED", Some("2024-01-01T18:00:00"))];
        let selected = select_games(&games, "RUNNING");
        assert!(selected.last_game.is_none());
        assert!(selected.current_game.is_none());
        assert!(selected.next_game.is_none());
    }

    #[test]
    fn test_first_running_game_wins() {
        let games = vec![
            game(1, "RUNNING", None),
            game(2, "RUNNING", Some("2024-01-01T12:00:00")),
        ];
        let selected = select_games(&games, "RUNNING");
        assert_eq!(id_of(&selected.current_game), Some(1));
    }

    #[test]
    fn test_live_status_token_is_configurable() {
        let games = vec![game(1, "LIVE", None)];
        assert!(select_games(&games, "RUNNING").current_game.is_none());
        assert_eq!(id_of(&select_games(&games, "LIVE").current_game), Some(1));
    }

    #[test]
    fn test_last_game_tie_goes_to_later_list_entry() {
        let games = vec![
            game(1, "FINAL", Some("2024-01-05T18:00:00")),
            game(2, "FINAL", Some("2024-01-05T18:00:00")),
        ];
        let selected = select_games(&games, "RUNNING");
        assert_eq!(id_of(&selected.last_game), Some(2));
    }

    #[test]
    fn test_next_game_tie_goes_to_earlier_list_entry() {
        let games = vec![
            game(1, "FUTURE", Some("2024-02-01T18:00:00")),
            game(2, "FUTURE", Some("2024-02-01T18:00:00")),
        ];
        let selected = select_games(&games, "RUNNING");
        assert_eq!(id_of(&selected.next_game), Some(1));
    }

    #[test]
    fn test_missing_matchstart_never_wins_over_scheduled() {
        let games = vec![
            game(1, "FUTURE", None),
            game(2, "FUTURE", Some("2024-06-01T18:00:00")),
            game(3, "FINAL", None),
            game(4, "FINAL", Some("2023-09-01T18:00:00")),
        ];
        let selected = select_games(&games, "RUNNING");
        assert_eq!(id_of(&selected.next_game), Some(2));
        assert_eq!(id_of(&selected.last_game), Some(4));
    }

    #[test]
    fn test_selection_is_pure() {
        let games = vec![
            game(1, "FINAL", Some("2024-01-01T18:00:00")),
            game(2, "RUNNING", None),
            game(3, "FUTURE", Some("2024-02-01T18:00:00")),
        ];
        let a = select_games(&games, "RUNNING");
        let b = select_games(&games, "RUNNING");
        assert_eq!(a.last_game, b.last_game);
        assert_eq!(a.current_game, b.current_game);
        assert_eq!(a.next_game, b.next_game);
    }

    #[test]
    fn test_ordering_properties_hold() {
        let games = vec![
            game(1, "FINAL", Some("2024-01-03T18:00:00")),
            game(2, "FINAL", Some("2024-01-07T18:00:00")),
            game(3, "FINAL", Some("2024-01-05T18:00:00")),
            game(4, "FUTURE", Some("2024-03-01T18:00:00")),
            game(5, "FUTURE", Some("2024-02-01T18:00:00")),
            game(6, "FUTURE", Some("2024-02-15T18:00:00")),
        ];
        let selected = select_games(&games, "RUNNING");
        let last = selected.last_game.unwrap();
        let next = selected.next_game.unwrap();
        assert_eq!(last.status.as_deref(), Some(STATUS_FINAL));
        assert_eq!(next.status.as_deref(), Some(STATUS_FUTURE));
        for g in &games {
            if g.status.as_deref() == Some(STATUS_FINAL) {
                assert!(last.matchstart >= g.matchstart);
            }
            if g.status.as_deref() == Some(STATUS_FUTURE) {
                assert!(next.matchstart <= g.matchstart);
            }
        }
    }
}
