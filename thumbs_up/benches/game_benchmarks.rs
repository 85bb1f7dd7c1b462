use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use thumbs_up::{
    GameSettings, PlayerId, ThumbsUpGame,
    net::request::parse_request,
};

const IDS: [&str; 3] = ["P1", "P2", "P3"];

/// Helper to create a started game with N players
fn seated_game(n_players: usize) -> ThumbsUpGame {
    let mut game = ThumbsUpGame::from(GameSettings::default());
    for player in &IDS[..n_players] {
        game.add_player(&PlayerId::new(player)).unwrap();
    }
    game
}

/// Play one round where everyone raises one thumb
fn play_round(game: &mut ThumbsUpGame, hit: bool) {
    let bettor = game.current_turn().cloned().unwrap();
    let responders: Vec<PlayerId> = game.players().others(&bettor).cloned().collect();
    let total = responders.len() as i64 + 1;
    let declared = if hit { total } else { total + 1 };

    game.submit_bet(&bettor, declared, 1).unwrap();
    for responder in &responders {
        game.submit_thumbs(responder, 1).unwrap();
    }
    game.evaluate_round().unwrap();
}

/// Benchmark a single missed round for 2 and 3 players
fn bench_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("round");

    for n_players in [2, 3] {
        group.bench_with_input(
            BenchmarkId::from_parameter(n_players),
            &n_players,
            |b, &n| {
                let mut game = seated_game(n);
                b.iter(|| play_round(&mut game, false));
            },
        );
    }

    group.finish();
}

/// Benchmark a full game from the first join to a winner
fn bench_full_game(c: &mut Criterion) {
    c.bench_function("full_game_3_players", |b| {
        b.iter(|| {
            let mut game = seated_game(3);
            while game.winner().is_none() {
                play_round(&mut game, true);
            }
        });
    });
}

/// Benchmark snapshot creation for a poller
fn bench_view(c: &mut Criterion) {
    let mut game = seated_game(3);
    play_round(&mut game, true);
    let viewer = PlayerId::new("P2");

    c.bench_function("view", |b| {
        b.iter(|| game.view(Some(&viewer)));
    });
}

/// Benchmark parsing a typical submit request
fn bench_parse_request(c: &mut Criterion) {
    let raw = b"POST /submit_thumbs HTTP/1.1\r\nHost: localhost\r\nPlayer-ID: P2\r\nContent-Type: application/json\r\nContent-Length: 12\r\n\r\n{\"thumbs\":1}";

    c.bench_function("parse_submit_request", |b| {
        b.iter(|| parse_request(raw).unwrap());
    });
}

criterion_group!(game_operations, bench_round, bench_full_game, bench_view);
criterion_group!(protocol, bench_parse_request);
criterion_main!(game_operations, protocol);
