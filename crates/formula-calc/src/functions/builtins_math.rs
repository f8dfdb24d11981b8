use formula_bignum::{BigDecimal, BigInteger, BigNumber, RoundingMode, MAX_POWER};

use crate::error::{CalcError, CalcResult};
use crate::functions::{decimal_from_f64, BuiltinFunction, FunctionContext};

inventory::submit! {
    BuiltinFunction {
        name: "sqrt",
        arity: 1,
        implementation: sqrt,
    }
}

fn sqrt(ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    let x = &args[0];
    if x.is_negative() {
        return Err(CalcError::evaluation("sqrt of a negative number"));
    }
    decimal_from_f64(x.to_f64().sqrt(), ctx.calculator())
}

inventory::submit! {
    BuiltinFunction {
        name: "ln",
        arity: 1,
        implementation: ln,
    }
}

fn ln(ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    let x = &args[0];
    if !x.is_positive() {
        return Err(CalcError::evaluation("ln of a non-positive number"));
    }
    decimal_from_f64(x.to_f64().ln(), ctx.calculator())
}

inventory::submit! {
    BuiltinFunction {
        name: "log",
        arity: 2,
        implementation: log,
    }
}

/// `log(x, base)`.
fn log(ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    let (x, base) = (&args[0], &args[1]);
    if !x.is_positive() {
        return Err(CalcError::evaluation("log of a non-positive number"));
    }
    let base = base.to_f64();
    if base <= 0.0 || base == 1.0 {
        return Err(CalcError::evaluation(format!("invalid logarithm base {base}")));
    }
    let x = x.to_f64();
    // The dedicated routines are exact at powers of their base; `ln(x) / ln(b)` is not.
    let result = if base == 10.0 {
        x.log10()
    } else if base == 2.0 {
        x.log2()
    } else {
        x.ln() / base.ln()
    };
    decimal_from_f64(result, ctx.calculator())
}

inventory::submit! {
    BuiltinFunction {
        name: "abs",
        arity: 1,
        implementation: abs,
    }
}

fn abs(_ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    Ok(args[0].abs())
}

inventory::submit! {
    BuiltinFunction {
        name: "floor",
        arity: 1,
        implementation: floor,
    }
}

fn floor(_ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    Ok(args[0].to_scale(0, RoundingMode::Floor)?)
}

inventory::submit! {
    BuiltinFunction {
        name: "ceil",
        arity: 1,
        implementation: ceil,
    }
}

fn ceil(_ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    Ok(args[0].to_scale(0, RoundingMode::Ceiling)?)
}

inventory::submit! {
    BuiltinFunction {
        name: "round",
        arity: 2,
        implementation: round,
    }
}

/// `round(x, digits)`, half away from zero. Negative `digits` round left of the point.
fn round(ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    let x = &args[0];
    let digits = args[1]
        .to_big_integer()
        .and_then(|d| d.to_i64())
        .map_err(|_| CalcError::evaluation("round digits must be an integer"))?;
    let magnitude = u32::try_from(digits.unsigned_abs())
        .ok()
        .filter(|m| *m <= MAX_POWER)
        .ok_or_else(|| CalcError::evaluation(format!("round digits {digits} out of range")))?;

    if digits >= 0 {
        return Ok(x.to_scale(magnitude, RoundingMode::HalfUp)?);
    }
    let factor = BigDecimal::from(BigInteger::of_with(10, ctx.calculator())?.power(magnitude)?);
    Ok(x
        .divided_by(&factor, 0, RoundingMode::HalfUp)?
        .multiplied_by(&factor))
}

inventory::submit! {
    BuiltinFunction {
        name: "min",
        arity: 2,
        implementation: min,
    }
}

fn min(_ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    Ok(args[0].min(&args[1]))
}

inventory::submit! {
    BuiltinFunction {
        name: "max",
        arity: 2,
        implementation: max,
    }
}

fn max(_ctx: &FunctionContext, args: &[BigDecimal]) -> CalcResult<BigDecimal> {
    Ok(args[0].max(&args[1]))
}
