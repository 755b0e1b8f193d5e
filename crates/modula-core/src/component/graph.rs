use std::collections::HashMap;
use std::sync::Arc;

use crate::component::error::ComponentError;
use crate::specification::{ComponentSpecification, SpecId};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Order `specs` so that every managed dependency precedes its dependents.
///
/// Depth-first over managed edges in the order given; ties keep that order.
/// Unmanaged edges impose nothing. A cycle, a managed target missing from
/// `specs`, or two specs with one id abort without a partial result.
pub fn start_order(
    specs: &[Arc<ComponentSpecification>],
) -> Result<Vec<Arc<ComponentSpecification>>, ComponentError> {
    let mut by_id: HashMap<&SpecId, &Arc<ComponentSpecification>> = HashMap::with_capacity(specs.len());
    for spec in specs {
        if by_id.insert(spec.id(), spec).is_some() {
            return Err(ComponentError::DuplicateComponent(spec.id().to_string()));
        }
    }

    let mut marks = HashMap::with_capacity(specs.len());
    let mut path = Vec::new();
    let mut order = Vec::with_capacity(specs.len());
    for spec in specs {
        visit(spec, &by_id, &mut marks, &mut path, &mut order)?;
    }
    Ok(order)
}

fn visit<'a>(
    spec: &'a Arc<ComponentSpecification>,
    by_id: &HashMap<&'a SpecId, &'a Arc<ComponentSpecification>>,
    marks: &mut HashMap<&'a SpecId, Mark>,
    path: &mut Vec<&'a SpecId>,
    order: &mut Vec<Arc<ComponentSpecification>>,
) -> Result<(), ComponentError> {
    match marks.get(spec.id()) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::InProgress) => {
            let start = path.iter().position(|id| *id == spec.id()).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(|id| id.to_string()).collect();
            cycle.push(spec.id().to_string());
            return Err(ComponentError::CyclicDependency(cycle));
        }
        None => {}
    }

    marks.insert(spec.id(), Mark::InProgress);
    path.push(spec.id());
    for dependency in spec.managed_dependencies() {
        let target = by_id.get(&dependency.target).copied().ok_or_else(|| {
            ComponentError::MissingDependency {
                component: spec.id().to_string(),
                dependency: dependency.target.to_string(),
            }
        })?;
        visit(target, by_id, marks, path, order)?;
    }
    path.pop();
    marks.insert(spec.id(), Mark::Done);
    order.push(Arc::clone(spec));
    Ok(())
}
