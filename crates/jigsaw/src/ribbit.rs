use bevy::log::info;
use bevy::prelude::*;
use bits_helpers::RibbitMessageHandler;
use ribbit_bits::{BitDuration, BitResult};

use crate::board::PuzzleBoard;
use crate::game::NewGame;

#[derive(Default, Clone, Copy)]
pub struct Jigsaw;

impl RibbitMessageHandler for Jigsaw {
    fn restart(world: &mut World) {
        info!("Restarting Jigsaw");
        world.send_event(NewGame);
    }

    fn end(world: &mut World) -> BitResult {
        info!("Ending Jigsaw");

        if world
            .get_resource::<PuzzleBoard>()
            .is_some_and(PuzzleBoard::is_solved)
        {
            BitResult::Success
        } else {
            BitResult::Failure
        }
    }

    fn duration(_world: &mut World) -> BitDuration {
        BitDuration::max_duration()
    }
}
