use citam_facility::Facility;
use citam_floorplan::SpaceId;
use citam_nav::FloorId;
use citam_util::{HashMap, RangeDistribution, SimRng};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::{AgentId, Meeting, MeetingPolicyParams};

/// Generate meetings across the facility's meeting rooms per §4.6.
pub fn generate_meetings(
    facility: &Facility,
    params: &MeetingPolicyParams,
    n_agents: u32,
    daylength: u32,
    rng: &mut SimRng,
) -> Vec<Meeting> {
    let mut rooms: Vec<(FloorId, SpaceId)> = (0..facility.floor_count() as FloorId)
        .flat_map(|floor| {
            facility
                .index(floor)
                .meeting_rooms
                .iter()
                .map(move |&room| (floor, room))
        })
        .collect();
    rooms.shuffle(rng);
    let take = (params.percent_meeting_rooms_used * rooms.len() as f64).ceil() as usize;
    rooms.truncate(take.min(rooms.len()));

    let duration_dist = RangeDistribution::new(
        params.min_meeting_duration as i32,
        params.max_meeting_length as i32,
    )
    .with_step(params.meeting_duration_increment.max(1) as i32);

    let cap = 2 * params.avg_meetings_per_person;
    let mut pool: Vec<AgentId> = (0..n_agents).map(AgentId::from).collect();
    let mut meetings_so_far: HashMap<AgentId, u32> = HashMap::default();
    let mut agent_windows: HashMap<AgentId, Vec<(u32, u32)>> = HashMap::default();

    let mut meetings = Vec::new();

    for (floor, room_id) in rooms {
        let room = facility.floorplan(floor).space(room_id);
        let target_n = sample_meeting_count(params.avg_meetings_per_room, rng);

        let mut cursor = 0u32;
        for _ in 0..target_n {
            let Some((start, end)) =
                place_in_room(&mut cursor, daylength, &duration_dist, params, rng)
            else {
                break;
            };

            let candidates: Vec<AgentId> = pool
                .iter()
                .copied()
                .filter(|agent| {
                    meetings_so_far.get(agent).copied().unwrap_or(0) < cap
                        && !agent_windows
                            .get(agent)
                            .is_some_and(|windows| windows.iter().any(|&(s, e)| s < end && start < e))
                })
                .collect();

            let max_attendees = (room.capacity as usize).min(candidates.len());
            if max_attendees < params.min_attendees_per_meeting as usize {
                continue;
            }
            let mut shuffled = candidates;
            shuffled.shuffle(rng);
            let n_attendees = rng.random_range(params.min_attendees_per_meeting as usize..=max_attendees);
            let mut attendees: Vec<AgentId> = shuffled.into_iter().take(n_attendees).collect();
            attendees.sort();

            for &agent in &attendees {
                *meetings_so_far.entry(agent).or_insert(0) += 1;
                agent_windows.entry(agent).or_default().push((start, end));
            }
            pool.retain(|a| meetings_so_far.get(a).copied().unwrap_or(0) < cap);

            meetings.push(Meeting {
                location: room_id,
                floor,
                start_time: start,
                end_time: end,
                attendees,
            });
        }
    }

    meetings
}

fn sample_meeting_count(avg: u32, rng: &mut SimRng) -> u32 {
    let delta: i32 = rng.random_range(-1..=1);
    (avg as i32 + delta).max(0) as u32
}

/// Find a `[start, end)` window at least `min_buffer` and at most
/// `max_buffer` timesteps after the room's last booking (`cursor`), or
/// `None` if no window fits within `daylength` after a bounded number of
/// attempts.
fn place_in_room(
    cursor: &mut u32,
    daylength: u32,
    duration_dist: &RangeDistribution,
    params: &MeetingPolicyParams,
    rng: &mut SimRng,
) -> Option<(u32, u32)> {
    for _ in 0..8 {
        let buffer = rng.random_range(params.min_buffer_between_meetings..=params.max_buffer_between_meetings.max(params.min_buffer_between_meetings));
        let duration = duration_dist.sample(rng) as u32;
        let start = *cursor + buffer;
        let end = start + duration;
        if end <= daylength {
            *cursor = end;
            return Some((start, end));
        }
    }
    None
}
