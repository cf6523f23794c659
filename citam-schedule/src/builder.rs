use citam_facility::{Entrance, Facility};
use citam_floorplan::SpaceId;
use citam_geom::Point;
use citam_nav::{FloorId, Navigation, RoutePoint};
use citam_util::SimRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::{AgentId, Meeting, Purpose, PurposeRule, Schedule, ScheduleBuildError, ScheduleBuildParams, ScheduleItem};

/// Build one agent's full-day schedule (§4.7).
pub struct ScheduleBuilder<'a> {
    pub facility: &'a Facility,
    pub navigation: &'a Navigation,
    pub params: &'a ScheduleBuildParams,
}

impl<'a> ScheduleBuilder<'a> {
    pub fn new(facility: &'a Facility, navigation: &'a Navigation, params: &'a ScheduleBuildParams) -> Self {
        ScheduleBuilder { facility, navigation, params }
    }

    pub fn build(
        &self,
        agent: AgentId,
        entrance: Entrance,
        exit: Entrance,
        office_floor: FloorId,
        office_id: SpaceId,
        shift_start: u32,
        meetings: &[&Meeting],
        rng: &mut SimRng,
    ) -> Result<Schedule, ScheduleBuildError> {
        let daylength = self.params.daylength;
        let start_time = sample_poisson(shift_start as f64, rng).min(2 * shift_start);
        let exit_time = sample_poisson(daylength as f64, rng).clamp(
            daylength.saturating_sub(self.params.buffer),
            daylength + self.params.buffer,
        );

        let office_point = self.facility.floorplan(office_floor).space(office_id).center();

        let mut itinerary: Vec<RoutePoint> = Vec::new();
        let mut items: Vec<ScheduleItem> = Vec::new();

        self.route_to(agent, &mut itinerary, entrance.point, entrance.floor, office_point, office_floor)?;
        items.push(ScheduleItem {
            purpose: Purpose::Transit,
            location: office_id,
            floor: office_floor,
            duration: itinerary.len() as u32,
        });

        let mut current_point = office_point;
        let mut current_floor = office_floor;

        let mut pending: Vec<&Meeting> = meetings.to_vec();
        pending.sort_by_key(|m| m.start_time);
        let mut pending = pending.into_iter().peekable();

        while start_time + (itinerary.len() as u32) < exit_time {
            let elapsed = start_time + itinerary.len() as u32;

            if let Some(&meeting) = pending.peek() {
                if meeting.start_time >= elapsed
                    && meeting.start_time <= elapsed + self.params.meeting_lookahead
                {
                    let meeting_point = self.facility.floorplan(meeting.floor).space(meeting.location).center();
                    self.route_to(agent, &mut itinerary, current_point, current_floor, meeting_point, meeting.floor)?;

                    let arrival = start_time + itinerary.len() as u32;
                    if arrival < meeting.start_time {
                        pad(&mut itinerary, meeting_point, meeting.floor, meeting.start_time - arrival);
                    }
                    let duration = meeting.end_time - meeting.start_time;
                    pad(&mut itinerary, meeting_point, meeting.floor, duration);
                    items.push(ScheduleItem {
                        purpose: Purpose::Meeting,
                        location: meeting.location,
                        floor: meeting.floor,
                        duration,
                    });

                    current_point = meeting_point;
                    current_floor = meeting.floor;
                    pending.next();
                    continue;
                }
            }

            let last_purpose = items.last().map(|i| i.purpose);
            let Some(rule) = pick_purpose(&self.params.possible_purposes, last_purpose, rng) else {
                break;
            };

            let remaining = exit_time.saturating_sub(elapsed);
            let mut duration = rule.duration_dist().sample(rng) as u32;
            if let Some(&next_meeting) = pending.peek() {
                duration = duration.min(next_meeting.start_time.saturating_sub(elapsed));
            }
            duration = duration.min(remaining);
            if duration < rule.min_duration {
                return Err(ScheduleBuildError::InsufficientTime {
                    agent,
                    needed: rule.min_duration,
                    available: duration,
                });
            }

            let Some((target_point, target_floor, target_space)) =
                self.purpose_location(rule.purpose, (office_point, office_floor, office_id), current_floor, rng)
            else {
                break;
            };

            self.route_to(agent, &mut itinerary, current_point, current_floor, target_point, target_floor)?;
            pad(&mut itinerary, target_point, target_floor, duration);
            items.push(ScheduleItem {
                purpose: rule.purpose,
                location: target_space,
                floor: target_floor,
                duration,
            });

            current_point = target_point;
            current_floor = target_floor;
        }

        self.route_to(agent, &mut itinerary, current_point, current_floor, exit.point, exit.floor)?;

        merge_adjacent(&mut items);

        Ok(Schedule {
            start_time,
            exit_time,
            entrance_floor: entrance.floor,
            entrance_door: entrance.door,
            exit_floor: exit.floor,
            exit_door: exit.door,
            office: office_id,
            office_floor,
            items,
            itinerary,
        })
    }

    fn route_to(
        &self,
        agent: AgentId,
        itinerary: &mut Vec<RoutePoint>,
        from: Point,
        from_floor: FloorId,
        to: Point,
        to_floor: FloorId,
    ) -> Result<(), ScheduleBuildError> {
        let route = self.navigation.shortest_route_multifloor(from, from_floor, to, to_floor);
        if route.is_empty() {
            return Err(ScheduleBuildError::NoRoute {
                agent,
                from,
                from_floor,
                to,
                to_floor,
            });
        }
        let pace = self.params.pace();
        itinerary.extend(citam_nav::unroll_route(&route, pace));
        Ok(())
    }

    fn purpose_location(
        &self,
        purpose: Purpose,
        office: (Point, FloorId, SpaceId),
        current_floor: FloorId,
        rng: &mut SimRng,
    ) -> Option<(Point, FloorId, SpaceId)> {
        match purpose {
            Purpose::OfficeWork => Some(office),
            Purpose::RestroomVisit => self.pick_space(current_floor, |idx| &idx.restrooms, rng),
            Purpose::CafeteriaVisit => self.pick_space(current_floor, |idx| &idx.cafes, rng),
            Purpose::Meeting | Purpose::Transit => None,
        }
    }

    fn pick_space(
        &self,
        floor: FloorId,
        pick: impl Fn(&citam_facility::FloorIndex) -> &Vec<SpaceId>,
        rng: &mut SimRng,
    ) -> Option<(Point, FloorId, SpaceId)> {
        let list = pick(self.facility.index(floor));
        let &id = list.choose(rng)?;
        Some((self.facility.floorplan(floor).space(id).center(), floor, id))
    }
}

fn pick_purpose(rules: &[PurposeRule], last: Option<Purpose>, rng: &mut SimRng) -> Option<PurposeRule> {
    let candidates: Vec<&PurposeRule> = rules
        .iter()
        .filter(|r| last != Some(r.purpose) || r.purpose.is_repeatable())
        .collect();
    candidates.choose(rng).map(|&r| *r)
}

fn pad(itinerary: &mut Vec<RoutePoint>, point: Point, floor: FloorId, duration: u32) {
    for _ in 0..duration {
        itinerary.push(RoutePoint { point, floor });
    }
}

fn merge_adjacent(items: &mut Vec<ScheduleItem>) {
    let mut merged: Vec<ScheduleItem> = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        if let Some(last) = merged.last_mut() {
            if last.purpose == item.purpose && last.location == item.location && last.floor == item.floor {
                last.duration += item.duration;
                continue;
            }
        }
        merged.push(item);
    }
    *items = merged;
}

/// Knuth's algorithm: `O(lambda)` expected iterations, fine for the
/// per-agent, once-per-schedule sampling this is used for.
fn sample_poisson(lambda: f64, rng: &mut SimRng) -> u32 {
    if lambda <= 0.0 {
        return 0;
    }
    let l = (-lambda).exp();
    let mut k = 0u32;
    let mut p = 1.0;
    loop {
        k += 1;
        p *= rng.random::<f64>();
        if p <= l {
            break;
        }
    }
    k - 1
}
