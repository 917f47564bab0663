use crate::storage::{get_tick, remove_tick, set_tick};
use clmm_math::add_delta;
use clmm_types::Error;
use soroban_sdk::Env;

/// Apply `liquidity_delta` to a boundary tick.
///
/// Returns whether the tick went from unreferenced to referenced or back.
#[allow(clippy::too_many_arguments)]
pub fn update(
    env: &Env,
    tick: i32,
    tick_current: i32,
    liquidity_delta: i128,
    fee_growth_global_0_x128: u128,
    fee_growth_global_1_x128: u128,
    upper: bool,
    max_liquidity: u128,
) -> Result<bool, Error> {
    let mut info = get_tick(env, tick);

    let gross_before = info.liquidity_gross;
    let gross_after = add_delta(gross_before, liquidity_delta)?;
    if gross_after > max_liquidity {
        return Err(Error::LiquidityOverflow);
    }

    if gross_before == 0 {
        // Growth before the first reference counts as below the tick
        if tick <= tick_current {
            info.fee_growth_outside_0_x128 = fee_growth_global_0_x128;
            info.fee_growth_outside_1_x128 = fee_growth_global_1_x128;
        }
        info.initialized = true;
    }
    info.liquidity_gross = gross_after;

    // Crossing upward enters at the lower tick and leaves at the upper one
    let net = if upper {
        info.liquidity_net.checked_sub(liquidity_delta)
    } else {
        info.liquidity_net.checked_add(liquidity_delta)
    };
    info.liquidity_net = net.ok_or(Error::LiquidityOverflow)?;

    set_tick(env, tick, &info);
    Ok((gross_before == 0) != (gross_after == 0))
}

/// Drop a tick no position references any more
pub fn clear(env: &Env, tick: i32) {
    remove_tick(env, tick);
}

/// Fee growth per unit of liquidity accrued inside `[tick_lower, tick_upper)`
pub fn get_fee_growth_inside(
    env: &Env,
    tick_lower: i32,
    tick_upper: i32,
    tick_current: i32,
    fee_growth_global_0_x128: u128,
    fee_growth_global_1_x128: u128,
) -> (u128, u128) {
    let lower = get_tick(env, tick_lower);
    let upper = get_tick(env, tick_upper);

    // Accumulators are modular
    let inside = |global: u128, lower_outside: u128, upper_outside: u128| {
        let below = if tick_current >= tick_lower {
            lower_outside
        } else {
            global.wrapping_sub(lower_outside)
        };
        let above = if tick_current < tick_upper {
            upper_outside
        } else {
            global.wrapping_sub(upper_outside)
        };
        global.wrapping_sub(below).wrapping_sub(above)
    };

    (
        inside(
            fee_growth_global_0_x128,
            lower.fee_growth_outside_0_x128,
            upper.fee_growth_outside_0_x128,
        ),
        inside(
            fee_growth_global_1_x128,
            lower.fee_growth_outside_1_x128,
            upper.fee_growth_outside_1_x128,
        ),
    )
}
