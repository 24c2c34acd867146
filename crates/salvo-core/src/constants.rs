//! Simulation constants and tuning parameters.
//!
//! Screen-space conventions: X grows to the right, Y grows downward. The
//! lowest visible ground row is `FIELD_HEIGHT`. Anything with a negative Y is
//! above the top of the screen.

// --- Playing field ---

/// Number of terrain columns.
pub const FIELD_WIDTH: i32 = 480;

/// Lowest displayable Y coordinate (the bottom of the field).
pub const FIELD_HEIGHT: i32 = 320;

/// Gap between each wall and the outermost starting slot.
pub const SIDE_BUFFER: i32 = 30;

/// Half-width of the averaging windows used to estimate the local slope.
pub const TERRAIN_ANGLE_DELTA: i32 = 10;

// --- Physics ---

/// Downward acceleration added to a projectile every step.
pub const GRAVITY: f32 = 0.1;

/// Wind is drawn from `[-MAX_WIND, MAX_WIND)`.
pub const MAX_WIND: i32 = 50;

/// Integer wind is divided by this to get horizontal acceleration per step.
pub const WIND_DIVISOR: f32 = 1300.0;

/// Launch speed in pixels per step is `power / POWER_TO_SPEED`.
pub const POWER_TO_SPEED: f32 = 100.0;

// --- Projectiles ---

/// Steps after which a projectile detonates in place.
pub const MAX_PROJECTILE_STEPS: u32 = 50_000;

/// Drawn radius of a projectile.
pub const PROJECTILE_RADIUS: i32 = 5;

/// Radius used for terrain and player collision tests.
pub const PROJECTILE_COLLISION_RADIUS: i32 = 4;

/// Maximum number of projectiles in flight during one ballistics phase.
pub const MAX_PROJECTILES: usize = 6;

/// Columns a roller payload advances per step.
pub const ROLLER_SPEED: i32 = 1;

/// Initial speed of a cluster fragment before tier scaling.
pub const CLUSTER_FRAGMENT_SPEED: f32 = 2.0;

/// Distance from the detonation point at which fragments appear.
pub const CLUSTER_SPAWN_OFFSET: f32 = 8.0;

// --- Explosions ---

/// Time for an explosion to reach its full radius (milliseconds).
pub const EXPLOSION_DURATION_MS: u64 = 1000;

/// Within this distance an explosion deals its full damage.
pub const BULLSEYE_RADIUS: i32 = PROJECTILE_COLLISION_RADIUS + PLAYER_COLLISION_RADIUS + 2;

/// Earned by the last player standing.
pub const SURVIVOR_BONUS: i64 = 200;

/// Earned for finishing off another player.
pub const KILL_BONUS: i64 = 150;

// --- Players ---

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 9;

pub const MAX_LIFE: u32 = 300;
pub const DEFAULT_STARTING_LIFE: u32 = 100;

/// Life restored by one unit of extra armor.
pub const EXTRA_ARMOR_LIFE: u32 = 100;

pub const MIN_POWER: i32 = 50;
pub const MAX_POWER: i32 = 1000;

pub const MIN_TURRET_ANGLE: i32 = 0;
pub const MAX_TURRET_ANGLE: i32 = 180;
pub const DEFAULT_TURRET_ANGLE: i32 = 45;

pub const PLAYER_COLLISION_RADIUS: i32 = 10;
pub const PLAYER_X_SIZE: i32 = 30;
pub const PLAYER_Y_SIZE: i32 = 21;
pub const TURRET_LENGTH: i32 = 20;

/// Fall damage per pixel fallen.
pub const FALL_DAMAGE_MULTIPLIER: f32 = 0.4;

pub const SELECTED_AURA_ALPHA: u8 = 0x55;
pub const DESELECTED_AURA_ALPHA: u8 = 0;

// --- Turn timing (milliseconds) ---

/// Pause after a round ends before the leaderboard accepts input.
pub const AFTER_ROUND_PAUSE_MS: u64 = 3000;

/// Poll interval while the leaderboard is waiting to be shown.
pub const LEADERBOARD_POLL_MS: u64 = 100;

/// Holding fire this long reaches `MAX_POWER`.
pub const MAX_FIRE_TIME_MS: u64 = 2400;

/// Poll interval for animated states.
pub const ANIMATION_TICK_MS: u64 = 1;

pub const COMPUTER_SELECT_WEAPON_MS: u64 = 500;
pub const COMPUTER_AIM_MS: u64 = 1000;
pub const COMPUTER_PRESS_FIRE_MS: u64 = 2500;

pub const TELEPORT_WHITENING_MS: u64 = 1000;
pub const TELEPORT_FADE_OUT_MS: u64 = 1000;
pub const TELEPORT_PAUSE_MS: u64 = 500;
pub const TELEPORT_FADE_IN_MS: u64 = 1000;
pub const TELEPORT_DIM_MS: u64 = 1000;

/// Length of the extra-armor aura pulse.
pub const EXTRA_ARMOR_ANIMATION_MS: u64 = 4000;

// --- Game setup ---

/// Round counts offered at game setup.
pub const ROUND_CHOICES: [u32; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 10, 20];

/// Starting cash amounts offered at game setup.
pub const STARTING_CASH_CHOICES: [i64; 7] = [0, 250, 500, 1000, 1500, 5000, 10000];
