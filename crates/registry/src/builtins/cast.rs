//! CAST between every pair of numeric types.

use rteval_common::memory::mask_to_cells;
use rteval_common::type_desc::ALL_NUMERIC_TYPES;
use rteval_common::{Fault, Value};

use crate::record::FunctionRecord;
use crate::registry::FunctionRegistry;
use crate::CAST;

pub(super) fn register(registry: &mut FunctionRegistry) {
    for &from in &ALL_NUMERIC_TYPES {
        for &to in &ALL_NUMERIC_TYPES {
            registry.insert(FunctionRecord::new(CAST, vec![from], vec![to], move |ctx| {
                let bits = mask_to_cells(ctx.pop_bits(from.cells()), from.cells());
                match Value::from_bits(from, bits).and_then(|v| v.cast(to)) {
                    Some((converted, in_range)) => {
                        ctx.push_bits(to.cells(), converted.to_bits());
                        if in_range {
                            Ok(())
                        } else {
                            Err(Fault::OutOfRange)
                        }
                    }
                    None => {
                        ctx.push_bits(to.cells(), 0);
                        Err(Fault::OutOfRange)
                    }
                }
            }));
        }
    }
}
