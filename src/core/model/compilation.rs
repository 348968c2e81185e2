use std::{
    collections::{BTreeMap, HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::{
    Argument, DocumentId, MethodDeclaration, ModelError, OBJECT_TYPE, Operation, OperationKinds,
    OperationRef, ProgramModel, Scope, Span, TypeChain, TypeDeclaration, TypeIdentity,
    dump::{ArgumentDump, CompilationDump, DocumentDump, OperationDump, RootDump, SpanDump, TypeDump},
};

struct SourceDocument {
    text: String,
    path: Option<PathBuf>,
}

struct Root {
    operation: Operation,
    scope: Scope,
}

/// In-memory program model loaded from a [`CompilationDump`].
pub struct Compilation {
    name: String,
    documents: BTreeMap<DocumentId, SourceDocument>,
    chains: HashMap<String, TypeChain>,
    types: Vec<TypeDeclaration>,
    roots: Vec<Root>,
}

impl Compilation {
    /// Reads a dump file. Documents given by `path` are resolved relative to
    /// the dump's directory.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let content = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut dump: CompilationDump = serde_json::from_str(&content)?;
        if dump.name.is_none() {
            dump.name = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.trim_end_matches(".json").trim_end_matches(".cmodel").to_string());
        }
        Self::build(dump, path.parent())
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Self::from_dump(serde_json::from_str(json)?)
    }

    /// Builds a compilation; relative document paths resolve against the
    /// current directory.
    pub fn from_dump(dump: CompilationDump) -> Result<Self, ModelError> {
        Self::build(dump, None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn documents(&self) -> impl Iterator<Item = &DocumentId> {
        self.documents.keys()
    }

    /// On-disk location of a document, if it was loaded from a file.
    pub fn document_path(&self, document: &DocumentId) -> Option<&Path> {
        self.documents.get(document)?.path.as_deref()
    }

    fn build(dump: CompilationDump, base_dir: Option<&Path>) -> Result<Self, ModelError> {
        let CompilationDump {
            name,
            documents: document_dumps,
            types: type_dumps,
            operations,
        } = dump;

        let mut documents = BTreeMap::new();
        for doc in document_dumps {
            let id = DocumentId::new(&doc.id);
            let source = read_document(doc, base_dir)?;
            if documents.insert(id.clone(), source).is_some() {
                return Err(ModelError::DuplicateDocument(id.to_string()));
            }
        }

        let chains = ChainBuilder::new(&type_dumps)?.build_all()?;
        let mut compilation = Self {
            name: name.unwrap_or_default(),
            documents,
            chains,
            types: Vec::with_capacity(type_dumps.len()),
            roots: Vec::with_capacity(operations.len()),
        };

        for ty in &type_dumps {
            let declaration = compilation.declaration(ty)?;
            compilation.types.push(declaration);
        }
        for root in operations {
            let root = compilation.root(root)?;
            compilation.roots.push(root);
        }
        compilation
            .roots
            .sort_by(|a, b| a.operation.span().cmp(b.operation.span()));

        debug!(
            compilation = %compilation.name,
            documents = compilation.documents.len(),
            types = compilation.types.len(),
            operations = compilation.roots.len(),
            "loaded compilation"
        );
        Ok(compilation)
    }

    fn chain_for(&self, name: &str) -> TypeChain {
        self.chains
            .get(name)
            .cloned()
            .unwrap_or_else(|| TypeChain::unresolved(TypeIdentity::new(name)))
    }

    fn span(&self, document: &DocumentId, SpanDump(start, len): SpanDump) -> Result<Span, ModelError> {
        let doc = self
            .documents
            .get(document)
            .ok_or_else(|| ModelError::UnknownDocument(document.to_string()))?;
        let end = start.saturating_add(len);
        if end > doc.text.len() {
            return Err(ModelError::SpanOutOfRange {
                document: document.to_string(),
                start,
                end,
            });
        }
        Ok(Span::new(document.clone(), start, len))
    }

    fn declaration(&self, ty: &TypeDump) -> Result<TypeDeclaration, ModelError> {
        let methods = ty
            .methods
            .iter()
            .map(|m| {
                Ok(MethodDeclaration {
                    name: m.name.clone(),
                    is_override: m.is_override,
                    span: self.span(&DocumentId::new(&m.document), m.span)?,
                })
            })
            .collect::<Result<_, ModelError>>()?;
        Ok(TypeDeclaration {
            identity: TypeIdentity::new(&ty.name),
            chain: self.chain_for(&ty.name),
            is_interface: ty.is_interface,
            methods,
        })
    }

    fn root(&self, root: RootDump) -> Result<Root, ModelError> {
        let document = DocumentId::new(&root.document);
        let scope = Scope {
            containing_type: root.containing_type.as_deref().map(|t| self.chain_for(t)),
            containing_member: root.containing_member,
        };
        Ok(Root {
            operation: self.operation(&document, root.operation)?,
            scope,
        })
    }

    fn operation(&self, document: &DocumentId, op: OperationDump) -> Result<Operation, ModelError> {
        let operation = match op {
            OperationDump::Literal { value, span } => Operation::Literal {
                value,
                span: self.span(document, span)?,
            },
            OperationDump::Assignment {
                property,
                property_type,
                value,
                span,
            } => Operation::Assignment {
                target_property: property,
                target_type: self.chain_for(&property_type),
                value: Box::new(self.operation(document, *value)?),
                span: self.span(document, span)?,
            },
            OperationDump::Invocation {
                method,
                method_type,
                receiver_type,
                arguments,
                span,
            } => Operation::Invocation {
                callee_name: method,
                callee_type: self.chain_for(&method_type),
                receiver_type: receiver_type.as_deref().map(|t| self.chain_for(t)),
                arguments: self.arguments(document, arguments)?,
                span: self.span(document, span)?,
            },
            OperationDump::Construction {
                constructed_type,
                arguments,
                span,
            } => Operation::Construction {
                constructed_type: self.chain_for(&constructed_type),
                arguments: self.arguments(document, arguments)?,
                span: self.span(document, span)?,
            },
            OperationDump::Binary {
                operator,
                left,
                right,
                span,
            } => Operation::Binary {
                operator,
                left: Box::new(self.operation(document, *left)?),
                right: Box::new(self.operation(document, *right)?),
                span: self.span(document, span)?,
            },
            OperationDump::Interpolation { span } => Operation::Interpolation {
                span: self.span(document, span)?,
            },
            OperationDump::Reference { name, span } => Operation::Reference {
                name,
                span: self.span(document, span)?,
            },
            OperationDump::CatchClause {
                caught_type,
                has_filter,
                handler_is_empty,
                span,
            } => Operation::CatchClause {
                caught_type: caught_type.as_deref().map(|t| self.chain_for(t)),
                has_filter,
                handler_is_empty,
                span: self.span(document, span)?,
            },
        };
        Ok(operation)
    }

    fn arguments(
        &self,
        document: &DocumentId,
        arguments: Vec<ArgumentDump>,
    ) -> Result<Vec<Argument>, ModelError> {
        arguments
            .into_iter()
            .enumerate()
            .map(|(index, arg)| {
                Ok(Argument {
                    position: arg.position.unwrap_or(index),
                    parameter_name: arg.name,
                    parameter_type: TypeIdentity::new(&arg.parameter_type),
                    value: self.operation(document, arg.value)?,
                })
            })
            .collect()
    }
}

fn read_document(doc: DocumentDump, base_dir: Option<&Path>) -> Result<SourceDocument, ModelError> {
    let path = doc.path.map(|path| match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path,
    });
    match (doc.text, path) {
        (Some(text), path) => Ok(SourceDocument { text, path }),
        (None, Some(path)) => {
            let text = fs::read_to_string(&path).map_err(|source| ModelError::Io {
                path: path.clone(),
                source,
            })?;
            Ok(SourceDocument {
                text,
                path: Some(path),
            })
        }
        (None, None) => Err(ModelError::MissingDocumentText(doc.id)),
    }
}

/// Computes ancestry chains for every declared type.
struct ChainBuilder<'a> {
    declared: HashMap<&'a str, &'a TypeDump>,
}

impl<'a> ChainBuilder<'a> {
    fn new(types: &'a [TypeDump]) -> Result<Self, ModelError> {
        let mut declared = HashMap::with_capacity(types.len());
        for ty in types {
            if declared.insert(ty.name.as_str(), ty).is_some() {
                return Err(ModelError::DuplicateType(ty.name.clone()));
            }
        }
        Ok(Self { declared })
    }

    fn build_all(&self) -> Result<HashMap<String, TypeChain>, ModelError> {
        self.declared
            .keys()
            .map(|name| Ok((name.to_string(), self.chain(name)?)))
            .collect()
    }

    fn chain(&self, name: &str) -> Result<TypeChain, ModelError> {
        let mut ancestors: Vec<TypeIdentity> = Vec::new();
        let mut seen = HashSet::new();
        let mut interfaces = Vec::new();
        let mut seen_interfaces = HashSet::new();

        let mut current = Some(name);
        while let Some(ty_name) = current {
            if !seen.insert(ty_name) {
                return Err(ModelError::CyclicInheritance(name.to_string()));
            }
            ancestors.push(TypeIdentity::new(ty_name));
            let Some(ty) = self.declared.get(ty_name) else {
                break;
            };
            for iface in &ty.interfaces {
                self.collect_interfaces(iface, &mut interfaces, &mut seen_interfaces);
            }
            current = ty.base.as_deref();
        }

        let is_interface = self.declared.get(name).is_some_and(|t| t.is_interface);
        if !is_interface && !seen.contains(OBJECT_TYPE) {
            ancestors.push(TypeIdentity::new(OBJECT_TYPE));
        }
        Ok(TypeChain::new(ancestors, interfaces))
    }

    fn collect_interfaces(
        &self,
        name: &'a str,
        out: &mut Vec<TypeIdentity>,
        seen: &mut HashSet<&'a str>,
    ) {
        if !seen.insert(name) {
            return;
        }
        out.push(TypeIdentity::new(name));
        if let Some(ty) = self.declared.get(name) {
            for base in &ty.interfaces {
                self.collect_interfaces(base, out, seen);
            }
        }
    }
}

impl ProgramModel for Compilation {
    fn resolve_well_known_type(&self, full_name: &str) -> Option<TypeIdentity> {
        self.chains
            .contains_key(full_name)
            .then(|| TypeIdentity::new(full_name))
    }

    fn operations(&self, kinds: OperationKinds) -> Vec<OperationRef<'_>> {
        let mut found: Vec<OperationRef<'_>> = self
            .roots
            .iter()
            .flat_map(|root| {
                root.operation
                    .descendants()
                    .filter(move |op| kinds.contains(op.kind()))
                    .map(move |operation| OperationRef {
                        operation,
                        scope: &root.scope,
                    })
            })
            .collect();
        // Stable: an enclosing operation stays ahead of a child starting at the same byte.
        found.sort_by(|a, b| {
            let (a, b) = (a.operation.span(), b.operation.span());
            (&a.document, a.start).cmp(&(&b.document, b.start))
        });
        found
    }

    fn declared_types(&self) -> &[TypeDeclaration] {
        &self.types
    }

    fn document_text(&self, document: &DocumentId) -> Option<&str> {
        self.documents.get(document).map(|d| d.text.as_str())
    }
}

/// Programmatic construction of a [`CompilationDump`].
///
/// ```
/// use catalint::core::model::{CompilationBuilder, ProgramModel};
///
/// let compilation = CompilationBuilder::new("Sample")
///     .document("a.cs", "class A {}")
///     .class("Gtk.Widget", None)
///     .build()
///     .unwrap();
/// assert!(compilation.resolve_well_known_type("Gtk.Widget").is_some());
/// ```
#[derive(Debug, Default)]
pub struct CompilationBuilder {
    dump: CompilationDump,
}

impl CompilationBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            dump: CompilationDump {
                name: Some(name.into()),
                ..Default::default()
            },
        }
    }

    pub fn document(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.dump.documents.push(DocumentDump::inline(id, text));
        self
    }

    pub fn class(self, name: &str, base: Option<&str>) -> Self {
        self.declare(TypeDump::class(name, base))
    }

    pub fn declare(mut self, ty: TypeDump) -> Self {
        self.dump.types.push(ty);
        self
    }

    pub fn root(mut self, root: RootDump) -> Self {
        self.dump.operations.push(root);
        self
    }

    pub fn into_dump(self) -> CompilationDump {
        self.dump
    }

    pub fn build(self) -> Result<Compilation, ModelError> {
        Compilation::from_dump(self.dump)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::core::model::{OperationKind, dump::MethodDump};

    const TEXT: &str = r#"label.Text = "Hi"; var l = new Label ("Name");"#;

    fn sample() -> CompilationBuilder {
        CompilationBuilder::new("Sample")
            .document("a.cs", TEXT)
            .class("Gtk.Widget", None)
            .class("Gtk.Label", Some("Gtk.Widget"))
            .root(RootDump::new(
                "a.cs",
                OperationDump::construction(
                    SpanDump::locate(TEXT, r#"new Label ("Name")"#).unwrap(),
                    "Gtk.Label",
                    vec![ArgumentDump::string(
                        0,
                        "str",
                        OperationDump::string(SpanDump::locate(TEXT, r#""Name""#).unwrap(), "Name"),
                    )],
                ),
            ))
            .root(RootDump::new(
                "a.cs",
                OperationDump::assignment(
                    SpanDump::locate(TEXT, r#"label.Text = "Hi""#).unwrap(),
                    "Text",
                    "Gtk.Label",
                    OperationDump::string(SpanDump::locate(TEXT, r#""Hi""#).unwrap(), "Hi"),
                ),
            ))
    }

    #[test]
    fn test_chains_end_at_object() {
        let compilation = sample().build().unwrap();
        let label = compilation
            .declared_types()
            .iter()
            .find(|t| t.identity.full_name() == "Gtk.Label")
            .unwrap();
        let names: Vec<_> = label.chain.ancestors().iter().map(|t| t.full_name()).collect();
        assert_eq!(names, vec!["Gtk.Label", "Gtk.Widget", OBJECT_TYPE]);
        assert!(label.chain.is_resolved());
    }

    #[test]
    fn test_interfaces_are_inherited() {
        let compilation = CompilationBuilder::new("Sample")
            .declare(TypeDump::interface("Base.ILocalizer"))
            .declare(TypeDump::interface("Base.IAddinLocalizer").implementing("Base.ILocalizer"))
            .declare(TypeDump::class("Base.Localizer", None).implementing("Base.IAddinLocalizer"))
            .class("App.Localizer", Some("Base.Localizer"))
            .build()
            .unwrap();
        let chain = compilation.chain_for("App.Localizer");
        assert!(chain.implements("Base.IAddinLocalizer"));
        assert!(chain.implements("Base.ILocalizer"));
        assert!(chain.derives_from("Base.Localizer"));
    }

    #[test]
    fn test_cyclic_inheritance_is_rejected() {
        let result = CompilationBuilder::new("Cycle")
            .class("A", Some("B"))
            .class("B", Some("A"))
            .build();
        assert!(matches!(result, Err(ModelError::CyclicInheritance(_))));
    }

    #[test]
    fn test_duplicate_type_is_rejected() {
        let result = CompilationBuilder::new("Dup")
            .class("A", None)
            .class("A", None)
            .build();
        assert!(matches!(result, Err(ModelError::DuplicateType(name)) if name == "A"));
    }

    #[test]
    fn test_only_declared_types_resolve() {
        let compilation = sample().build().unwrap();
        assert!(compilation.resolve_well_known_type("Gtk.Label").is_some());
        assert!(
            compilation
                .resolve_well_known_type("MonoDevelop.Core.GettextCatalog")
                .is_none()
        );
        let chain = compilation.chain_for("System.Text.StringBuilder");
        assert!(!chain.is_resolved());
    }

    #[test]
    fn test_operations_are_filtered_and_in_source_order() {
        let compilation = sample().build().unwrap();
        let literals: Vec<_> = compilation
            .operations(OperationKinds::of(&[OperationKind::Literal]))
            .into_iter()
            .map(|r| r.operation.as_string_literal().unwrap().to_string())
            .collect();
        assert_eq!(literals, vec!["Hi", "Name"]);

        let all = compilation.operations(OperationKinds::ALL);
        let kinds: Vec<_> = all.iter().map(|r| r.operation.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                OperationKind::Assignment,
                OperationKind::Literal,
                OperationKind::Construction,
                OperationKind::Literal,
            ]
        );
    }

    #[test]
    fn test_syntax_text() {
        let compilation = sample().build().unwrap();
        let doc = DocumentId::new("a.cs");
        let span = Span::new(doc.clone(), 13, 4);
        assert_eq!(compilation.syntax_text(&span), Some(r#""Hi""#));
        assert_eq!(compilation.syntax_text(&Span::new(doc, 40, 100)), None);
        assert_eq!(
            compilation.syntax_text(&Span::new(DocumentId::new("missing.cs"), 0, 1)),
            None
        );
    }

    #[test]
    fn test_span_out_of_range_is_rejected() {
        let result = CompilationBuilder::new("Bad")
            .document("a.cs", "short")
            .root(RootDump::new(
                "a.cs",
                OperationDump::reference(SpanDump(3, 10), "x"),
            ))
            .build();
        assert!(matches!(result, Err(ModelError::SpanOutOfRange { end: 13, .. })));
    }

    #[test]
    fn test_unknown_document_is_rejected() {
        let result = CompilationBuilder::new("Bad")
            .class("Gtk.Object", None)
            .declare(
                TypeDump::class("App.Window", Some("Gtk.Object")).with_method(MethodDump::new(
                    "nowhere.cs",
                    SpanDump(0, 1),
                    "Destroy",
                    true,
                )),
            )
            .build();
        assert!(matches!(result, Err(ModelError::UnknownDocument(id)) if id == "nowhere.cs"));
    }

    #[test]
    fn test_load_reads_documents_relative_to_dump() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/Main.cs"), TEXT).unwrap();
        let dump = CompilationDump {
            name: None,
            documents: vec![DocumentDump::file("Main.cs", "src/Main.cs")],
            ..Default::default()
        };
        let dump_path = dir.path().join("app.cmodel.json");
        fs::write(&dump_path, serde_json::to_string(&dump).unwrap()).unwrap();

        let compilation = Compilation::load(&dump_path).unwrap();
        let doc = DocumentId::new("Main.cs");
        assert_eq!(compilation.name(), "app");
        assert_eq!(compilation.document_text(&doc), Some(TEXT));
        assert_eq!(
            compilation.document_path(&doc),
            Some(dir.path().join("src/Main.cs").as_path())
        );
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let dir = tempdir().unwrap();
        let err = Compilation::load(&dir.path().join("nope.cmodel.json"))
            .err()
            .unwrap();
        assert!(matches!(err, ModelError::Io { .. }));
        assert!(err.to_string().contains("nope.cmodel.json"));
    }
}
