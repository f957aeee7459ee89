use blackjack_table::{
    Card, Deck, MemoryRecordStore, MemorySessionStore, Outcome, Round, RoundError, RoundState,
    SessionStore, Summary, Table, TableConfig, TableError,
};

/// Deck that deals `order` front to back.
fn stacked(order: &[&str]) -> Deck {
    let cards = order
        .iter()
        .rev()
        .map(|token| token.parse::<Card>().unwrap())
        .collect();
    Deck::from_cards(cards).unwrap()
}

fn table_with(session_id: &str, order: &[&str]) -> Table<MemorySessionStore, MemoryRecordStore> {
    let mut table = Table::new(
        TableConfig::with_seed(1),
        MemorySessionStore::new(),
        MemoryRecordStore::new(),
    );
    let round = Round::deal_from(stacked(order)).unwrap();
    table.sessions_mut().save(session_id, &round).unwrap();
    table
}

#[test]
fn full_round_records_exactly_once() {
    // Player 5+6, dealer 9 with 7 in the hole. Player hits a 9 for 20,
    // dealer draws a 2 and stops on 18.
    let mut table = table_with("s1", &["5H", "9S", "6H", "7D", "9C", "2C", "KD"]);

    let view = table.hit("s1", "ana").unwrap();
    assert_eq!(view.state, RoundState::InProgress);
    assert_eq!(view.player_score, 20);
    assert_eq!(view.dealer_cards[1], None);
    assert!(table.records().results().is_empty());

    let view = table.stand("s1", "ana").unwrap();
    assert_eq!(view.state, RoundState::Resolved);
    assert_eq!(view.dealer_score, 18);
    assert_eq!(view.outcome, Some(Outcome::Win));
    assert_eq!(view.message.as_deref(), Some("You win!"));
    assert_eq!(table.records().results().len(), 1);

    let second = table.stand("s1", "ana");
    assert!(matches!(
        second,
        Err(TableError::Round(RoundError::InvalidState {
            state: RoundState::Resolved,
            ..
        }))
    ));
    assert_eq!(table.records().results().len(), 1);

    let result = &table.records().results()[0];
    assert_eq!(result.user, "ana");
    assert_eq!(result.player_score, 20);
    assert_eq!(result.dealer_score, 18);
}

// Dealer holds 14 and would draw on a stand; a player bust ends the round
// with the dealer hand scored as dealt.
#[test]
fn bust_on_hit_records_a_loss_without_dealer_draw() {
    let mut table = table_with("s1", &["TS", "9S", "6H", "5D", "KC", "2C"]);

    let view = table.hit("s1", "bo").unwrap();
    assert_eq!(view.outcome, Some(Outcome::Loss));
    assert_eq!(view.dealer_cards.len(), 2);
    assert_eq!(view.dealer_score, 14);
    assert_eq!(view.message.as_deref(), Some("You bust. Dealer wins."));

    assert!(table.hit("s1", "bo").is_err());
    assert_eq!(
        table.summary("bo").unwrap(),
        Summary {
            wins: 0,
            ties: 0,
            losses: 1,
        }
    );
}

#[test]
fn stored_round_is_reloaded_between_actions() {
    let mut table = table_with("s1", &["2H", "TS", "3H", "8D", "4C", "5C"]);
    table.hit("s1", "cy").unwrap();

    let stored = table.sessions().load("s1").unwrap().unwrap();
    assert_eq!(stored.player().len(), 3);
    assert_eq!(stored.deck().remaining_cards(), 1);

    let payload = table.sessions().payload("s1").unwrap();
    assert!(payload.contains(r#""player":["2H","3H","4C"]"#));
}

#[test]
fn leaderboard_collects_all_players() {
    let mut table = table_with("a", &["TH", "9S", "TD", "8D"]);
    table.stand("a", "ana").unwrap();

    let round = Round::deal_from(stacked(&["TH", "9S", "8D", "TD"])).unwrap();
    table.sessions_mut().save("b", &round).unwrap();
    table.stand("b", "bo").unwrap();

    let round = Round::deal_from(stacked(&["TH", "9S", "9D", "TD"])).unwrap();
    table.sessions_mut().save("c", &round).unwrap();
    table.stand("c", "cy").unwrap();

    let board = table.leaderboard().unwrap();
    let names: Vec<&str> = board.iter().map(|e| e.username.as_str()).collect();
    assert_eq!(names, ["ana", "cy", "bo"]);
    assert_eq!(board[1].ties, 1);
    assert_eq!(board[2].losses, 1);
}

#[test]
fn three_results_summarize_per_user() {
    let mut table = table_with("s", &["TH", "9S", "TD", "8D"]);
    table.stand("s", "dee").unwrap();
    for order in [["TH", "9S", "TD", "8D"], ["TH", "9S", "7D", "TD"]] {
        let round = Round::deal_from(stacked(&order)).unwrap();
        table.sessions_mut().save("s", &round).unwrap();
        table.stand("s", "dee").unwrap();
    }
    assert_eq!(
        table.summary("dee").unwrap(),
        Summary {
            wins: 2,
            ties: 0,
            losses: 1,
        }
    );
}
