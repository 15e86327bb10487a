use crate::ast::RaNode;
use crate::catalog::Catalog;
use crate::error::CompileError;

pub fn analyze(node: &mut RaNode, catalog: &Catalog) -> Result<(), CompileError> {
    let RaNode::Relation { header, name } = node else {
        unreachable!("relation::analyze called on a non-relation node")
    };

    let relation = catalog
        .get(name)
        .ok_or_else(|| CompileError::MissingRelation(name.clone()))?;

    header.attributes = relation.attribute_names();
    header.domains = relation.domains();
    Ok(())
}
