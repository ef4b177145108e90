use std::cmp::Ordering;

use crate::comparison::cmp_values;
use crate::context::MatchContext;
use crate::errors::Result;

use super::Operand;

fn compare_current(
    ctx: &MatchContext<'_>,
    operand: &Operand,
    pred_on_ord: impl Fn(Ordering) -> bool,
) -> Result<bool> {
    let Some(current) = ctx.current_value() else {
        return Ok(false);
    };
    let other = operand.resolve(ctx)?;
    Ok(other
        .as_value()
        .is_some_and(|other| cmp_values(current, other, pred_on_ord)))
}

pub fn gt(ctx: &MatchContext<'_>, operand: &Operand) -> Result<bool> {
    compare_current(ctx, operand, Ordering::is_gt)
}

pub fn lt(ctx: &MatchContext<'_>, operand: &Operand) -> Result<bool> {
    compare_current(ctx, operand, Ordering::is_lt)
}
