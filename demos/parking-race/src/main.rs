use std::time::Duration;

use parkrace::logging;
use parkrace::prelude::*;
use rand::seq::SliceRandom;

const PLAYERS: [&str; 4] = ["alice", "bora", "chen", "dae"];

// ---------------------------------------------------------------------------
// Lot data
// ---------------------------------------------------------------------------

/// A couple of lots to race on when no API key is configured.
fn sample_lots() -> Vec<ParkingLot> {
    vec![
        ParkingLot::new(
            1,
            "Seoul Jung-gu Sejong-daero 110",
            "4210",
            LotCounters::new(3, 0, 6, 2),
            11,
        ),
        ParkingLot::new(
            2,
            "Seoul Mapo-gu World Cup-ro 240",
            "980",
            LotCounters::new(0, 2, 0, 4),
            6,
        ),
    ]
}

// ---------------------------------------------------------------------------
// Race
// ---------------------------------------------------------------------------

async fn wait_ready<S: LotSource>(
    service: &RoomService<S>,
    room_id: &RoomId,
) -> Result<(), String> {
    loop {
        match service.room_status(room_id).await {
            Some(RoomStatus::Ready) => return Ok(()),
            Some(RoomStatus::Failed { reason }) => return Err(reason),
            Some(RoomStatus::Pending) => {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            None => return Err(format!("room {room_id} was never created")),
        }
    }
}

async fn run<S: LotSource>(service: RoomService<S>, lot_id: u32) -> Result<RoomStats, String> {
    let room_id = service.create_room(lot_id).await;
    wait_ready(&service, &room_id).await?;

    let room = service
        .get_room(&room_id)
        .await
        .ok_or_else(|| format!("room {room_id} disappeared"))?;
    tracing::info!(
        %room_id,
        address = %room.lot.address,
        spaces = room.lot.spaces.len(),
        "race on"
    );

    let space_ids: Vec<SpaceId> = room.lot.spaces.iter().map(|s| s.id).collect();

    let mut racers = Vec::new();
    for name in PLAYERS {
        let player = PlayerId::from(name);
        service.join_room(&room_id, player.clone()).await;

        let mut order = space_ids.clone();
        order.shuffle(&mut rand::rng());

        let service = service.clone();
        let room_id = room_id.clone();
        racers.push(tokio::spawn(async move {
            for space_id in order {
                let outcome = service.occupy_space(&room_id, space_id, &player).await;
                if outcome.success {
                    tracing::debug!(%player, space_id, "claimed");
                }
                tokio::task::yield_now().await;
            }
        }));
    }
    for racer in racers {
        racer.await.map_err(|e| e.to_string())?;
    }

    service
        .get_stats(&room_id)
        .await
        .ok_or_else(|| format!("room {room_id} disappeared"))
}

fn print_stats(stats: &RoomStats) {
    println!(
        "room {}: {}/{} spaces taken",
        stats.room_id, stats.occupied_spaces, stats.total_spaces
    );

    let mut board: Vec<(&PlayerId, &usize)> = stats.leaderboard.iter().collect();
    board.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (rank, (player, count)) in board.into_iter().enumerate() {
        println!("{:>2}. {player:<8} {count}", rank + 1);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init()?;

    let source_config = SourceConfig::from_env();
    let config = ServiceConfig::default();

    let stats = if source_config.api_key.is_empty() {
        tracing::info!("PUBLIC_API_KEY not set, racing on sample lots");
        run(RoomService::new(StaticLotSource::new(sample_lots()), config), 1).await?
    } else {
        run(RoomService::new(HttpLotSource::new(source_config)?, config), 1).await?
    };

    print_stats(&stats);
    Ok(())
}
