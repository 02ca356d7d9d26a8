use std::sync::Arc;
use std::time::Duration;

use quizhall::prelude::*;
use tokio::sync::mpsc::UnboundedReceiver;

// ---------------------------------------------------------------------------
// Quiz
// ---------------------------------------------------------------------------

const QUIZ: &str = r#"{
    "title": "Quiz Night",
    "questions": [
        {
            "prompt": "Which planet is known as the red planet?",
            "choices": ["Venus", "Mars", "Jupiter", "Mercury"],
            "correct": 1,
            "duration_secs": 10
        },
        {
            "prompt": "How many sides does a hexagon have?",
            "choices": ["5", "6", "7", "8"],
            "correct": 1
        },
        {
            "prompt": "What is the chemical symbol for gold?",
            "choices": ["Ag", "Go", "Au", "Gd"],
            "correct": 2,
            "duration_secs": 15
        }
    ]
}"#;

const PLAYERS: [&str; 4] = ["ada", "grace", "linus", "barbara"];

/// Time the host lets the countdown run before opening answers.
const COUNTDOWN: Duration = Duration::from_millis(200);

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

/// Each bot picks a fixed choice per question.
fn bot_choice(player: PlayerId, question: usize, choices: usize) -> usize {
    (player.0 as usize + question) % choices
}

async fn next_message(rx: &mut UnboundedReceiver<ServerMessage>) -> Result<ServerMessage, String> {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .map_err(|_| "timed out waiting for the game".to_string())?
        .ok_or_else(|| "host mailbox closed".to_string())
}

/// Plays one full game with scripted bots and returns the final standings.
async fn play(quiz: Quiz) -> Result<Vec<quizhall::protocol::ScoreEntry>, Box<dyn std::error::Error>> {
    let quiz = Arc::new(quiz);
    let mut coordinator = Coordinator::new();
    let pin = coordinator.create_game(Arc::clone(&quiz))?;
    let game = coordinator.handle(pin).ok_or("game vanished")?;
    tracing::info!(%pin, title = %quiz.title, "game open");

    let (host, mut host_rx) = ChannelParticipant::new();
    game.attach_host(host).await?;

    let mut bots = Vec::new();
    for (i, name) in PLAYERS.iter().enumerate() {
        let id = PlayerId(i as u64 + 1);
        let (player, rx) = ChannelParticipant::new();
        game.join(id, *name, player).await?;
        bots.push((id, rx));
    }

    game.start().await?;
    let mut standings = Vec::new();
    loop {
        match next_message(&mut host_rx).await? {
            ServerMessage::NewQuestion(shown) => {
                println!("Q{}/{}: {}", shown.index, shown.total, shown.question.prompt);
                tokio::time::sleep(COUNTDOWN).await;
                game.countdown_done().await?;
                for (id, _) in &bots {
                    let choice = bot_choice(*id, shown.index - 1, shown.question.choices.len());
                    game.submit_answer(*id, choice).await?;
                }
            }
            ServerMessage::RoundResult(result) => {
                let answer = quiz
                    .question(result.index - 1)
                    .and_then(|q| q.choices.get(result.correct))
                    .map_or("?", String::as_str);
                println!("   answer: {answer}  tally: {:?}", result.tally);
                game.next_question().await?;
            }
            ServerMessage::GameOver(over) => {
                standings = over.leaderboard;
                game.finish().await?;
                break;
            }
            ServerMessage::GameAborted(aborted) => {
                return Err(format!("game aborted: {}", aborted.reason).into());
            }
            other => tracing::debug!(kind = %other.kind(), "ignored"),
        }
    }

    for (id, mut rx) in bots {
        let mut acks = 0;
        while let Ok(message) = rx.try_recv() {
            if message.kind() == MessageKind::AnswerAck {
                acks += 1;
            }
        }
        tracing::debug!(player_id = %id, acks, "bot done");
    }

    let reaped = coordinator.reap_next().await.ok_or("reaper closed")?;
    tracing::info!(pin = %reaped.pin, reason = ?reaped.reason, "game over");
    Ok(standings)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    quizhall::telemetry::init();

    let quiz: Quiz = serde_json::from_str(QUIZ)?;
    quiz.validate()?;

    let standings = play(quiz).await?;
    println!();
    for (rank, row) in standings.iter().enumerate() {
        println!("{:>2}. {:<10} {}", rank + 1, row.name, row.score);
    }
    Ok(())
}
