use crate::context::MatchContext;
use crate::errors::Result;

use super::equality::node_equals;
use super::ListOperand;

pub fn is_in(ctx: &MatchContext<'_>, list: &ListOperand) -> Result<bool> {
    let candidates = list.resolve(ctx)?;
    Ok(candidates
        .iter()
        .any(|candidate| node_equals(ctx.current(), candidate)))
}
