//! Projectile simulation driving the pools through a frame loop.
//!
//! A turret fires projectiles that fly along +X. Each projectile is
//! released on impact with the arena wall or when its lifetime runs out,
//! whichever comes first, and an impact spawns a short-lived spark. Every
//! so often a projectile is destroyed behind the pools' back.

use crate::settings::{RuntimeSettings, SimulationSettings};
use respawn_core::glam::{Quat, Vec3};
use respawn_core::time::TICK_DURATION;
use respawn_core::{
    Entity, PoolContext, PoolEvent, PrefabId, SceneWorld, SimulationTime, Spatial, TickDriver,
    TickDriverError, TickLoop,
};
use respawn_metrics::TickTimer;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

type Context = PoolContext<SceneWorld, SimulationTime>;

pub struct Report {
    pub frames: u32,
    pub spawned_total: u64,
    pub peak_live: usize,
    pub average_tick_ms: f64,
    pub events: Vec<(PoolEvent, u64)>,
}

#[derive(Clone, Copy)]
struct Prefabs {
    projectile: PrefabId,
    spark: PrefabId,
}

pub struct Simulation {
    settings: SimulationSettings,
    context: Rc<RefCell<Context>>,
    tick_loop: TickLoop,
    driver: TickDriver<TickLoop>,
    prefabs: Prefabs,
}

impl Simulation {
    pub fn new(settings: RuntimeSettings) -> Result<Self, TickDriverError> {
        let mut world = SceneWorld::new();
        let prefabs = Prefabs {
            projectile: world.add_prefab("Projectile", Spatial::IDENTITY.with_scale(Vec3::splat(0.2))),
            spark: world.add_prefab(
                "Spark",
                Spatial::IDENTITY.with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_4)),
            ),
        };

        let context = Rc::new(RefCell::new(PoolContext::new(
            world,
            SimulationTime::new(),
            settings.pool,
        )));
        let sim = settings.simulation;

        let mut tick_loop = TickLoop::new();
        let movement_ctx = Rc::clone(&context);
        let movement_settings = sim.clone();
        tick_loop.push(
            "projectile_movement",
            Box::new(move || {
                if let Ok(mut ctx) = movement_ctx.try_borrow_mut() {
                    move_projectiles(&mut ctx, prefabs, &movement_settings);
                }
            }),
        );

        let mut driver = TickDriver::new();
        driver.install(&mut tick_loop, Rc::clone(&context))?;

        {
            let mut ctx = context.borrow_mut();
            ctx.initialize(prefabs.projectile, sim.warmup.projectiles, sim.warmup.per_tick);
            ctx.initialize(prefabs.spark, sim.warmup.sparks, sim.warmup.per_tick);
        }

        Ok(Self {
            settings: sim,
            context,
            tick_loop,
            driver,
            prefabs,
        })
    }

    /// Run the configured number of frames.
    pub fn run(&mut self) -> Report {
        let mut timer = TickTimer::new(120);
        let mut peak_live = 0;
        let lifetime = Duration::from_millis(self.settings.projectile_lifetime_ms);

        for frame in 0..self.settings.frames {
            {
                let mut ctx = self.context.borrow_mut();
                ctx.clock_mut().advance_tick();

                if self.settings.fire_interval > 0 && frame % self.settings.fire_interval == 0 {
                    ctx.get_and_release(self.prefabs.projectile, lifetime);
                }
                if self.settings.sabotage_interval > 0 && frame % self.settings.sabotage_interval == 0 {
                    sabotage_one(&mut ctx, self.prefabs.projectile);
                }
            }

            timer.begin();
            self.tick_loop.run_once();
            timer.end();

            let ctx = self.context.borrow();
            peak_live = peak_live.max(ctx.host().live_count());
            if frame > 0 && frame % 120 == 0 {
                tracing::info!(
                    frame,
                    projectiles = ctx.pool_count(self.prefabs.projectile),
                    sparks = ctx.pool_count(self.prefabs.spark),
                    pending = ctx.pending_releases(),
                    "pool status"
                );
            }
        }

        let ctx = self.context.borrow();
        Report {
            frames: self.settings.frames,
            spawned_total: ctx.host().spawned_total(),
            peak_live,
            average_tick_ms: timer.average_ms(),
            events: PoolEvent::ALL
                .iter()
                .map(|&event| (event, ctx.stats().get(event)))
                .collect(),
        }
    }

    /// Remove the driver from the loop and destroy every pooled instance.
    pub fn shutdown(&mut self) -> Result<(), TickDriverError> {
        self.driver.teardown(&mut self.tick_loop, &*self.context)
    }

    #[cfg(test)]
    fn context(&self) -> std::cell::Ref<'_, Context> {
        self.context.borrow()
    }
}

fn move_projectiles(ctx: &mut Context, prefabs: Prefabs, settings: &SimulationSettings) {
    let dt = TICK_DURATION.as_secs_f32();
    let spark_lifetime = Duration::from_millis(settings.spark_lifetime_ms);
    let flying: Vec<Entity> = ctx
        .host()
        .active_entities()
        .filter(|&e| ctx.host().prefab_of(e) == Some(prefabs.projectile))
        .collect();

    for projectile in flying {
        let Some(spatial) = ctx.host_mut().spatial_mut(projectile) else {
            continue;
        };
        spatial.position.x += settings.projectile_speed * dt;
        if spatial.position.x < settings.arena_half_width {
            continue;
        }

        let impact = spatial.position;
        // Its lifetime release stays queued. If the projectile is fired again
        // before that comes due, the stale release cuts the new flight short.
        ctx.release(projectile);
        if let Some(spark) = ctx.get_and_release(prefabs.spark, spark_lifetime) {
            if let Some(spatial) = ctx.host_mut().spatial_mut(spark) {
                spatial.position = impact;
            }
        }
    }
}

fn sabotage_one(ctx: &mut Context, projectile: PrefabId) {
    let victim = ctx
        .host()
        .active_entities()
        .find(|&e| ctx.host().prefab_of(e) == Some(projectile));
    if let Some(victim) = victim {
        tracing::debug!(%victim, "destroying projectile outside the pool");
        ctx.host_mut().despawn(victim);
    }
}
