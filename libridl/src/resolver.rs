//
// resolver.rs
// The RIDL Compiler
//

//! The type resolver turns a run of tokens nominally describing a
//! C/C++ type into a node of the semantic model. It folds the
//! modifier soup (`signed`/`unsigned`/`short`/`long`/`long long`/
//! `const`/…) into a bag of flags, validates legal combinations,
//! resolves user type names against the enclosing scope (walking
//! typedef chains), and synthesizes a fresh typedef whenever the
//! modifiers force a type distinct from the one that was named.

use error::{ Error, Result };
use lexer::{ TokenKind, TokenList };
use stream::TokenStack;
use model::{ self, Context, PredefinedType, RcContext };


/// Accumulates the modifier soup of a single type-denoting token
/// run. Identifiers that are not modifier keywords build up the
/// (possibly `::`-qualified) type name instead.
#[derive(Debug, Default)]
struct ModifierBag {
    any_basic: bool,
    any_other: bool,

    signed: bool,
    unsigned: bool,
    char: bool,
    short: bool,
    int: bool,
    float: bool,
    double: bool,
    total_longs: usize,

    constant: bool,

    last_was_typename: bool,
    last_was_scope: bool,

    type_name: String,
}

fn invalid_modifier() -> Error {
    Error::Failure {
        message: "has invalid type modifier".to_owned(),
    }
}

impl ModifierBag {
    fn insert(&mut self, lexeme: &str) -> Result<()> {
        match lexeme {
            "signed" => {
                if self.unsigned || self.signed || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.signed = true;
                self.any_basic = true;
            },
            "unsigned" => {
                if self.unsigned || self.signed || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.unsigned = true;
                self.any_basic = true;
            },
            "long" => {
                if self.total_longs > 1 || self.char || self.short || self.float {
                    return Err(invalid_modifier());
                }
                self.total_longs += 1;
                self.any_basic = true;
            },
            "char" => {
                if self.total_longs > 0 || self.char || self.short || self.int || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.char = true;
                self.any_basic = true;
            },
            "short" => {
                if self.total_longs > 0 || self.char || self.short || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.short = true;
                self.any_basic = true;
            },
            "int" => {
                if self.char || self.int || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.int = true;
                self.any_basic = true;
            },
            "float" => {
                if self.signed || self.unsigned || self.total_longs > 0 || self.char || self.int || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.float = true;
                self.any_basic = true;
            },
            "double" => {
                if self.signed || self.unsigned || self.char || self.int || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.double = true;
                self.any_basic = true;
            },
            "const" => {
                if self.constant {
                    return Err(invalid_modifier());
                }
                self.constant = true;
                self.any_other = true;
            },
            _ => {
                if self.last_was_typename {
                    return Err(Error::Failure {
                        message: "has type name redeclared".to_owned(),
                    });
                }
                self.last_was_typename = true;
                self.last_was_scope = false;
                self.type_name.push_str(lexeme);
            },
        }

        Ok(())
    }

    fn insert_scope(&mut self) -> Result<()> {
        if self.last_was_scope {
            return Err(invalid_modifier());
        }
        self.last_was_typename = false;
        self.last_was_scope = true;
        self.type_name.push_str("::");
        Ok(())
    }

    // Derives the predefined typedef denoted by the modifier bag
    // alone, when no type name was given.
    fn basic_type(&self) -> Result<PredefinedType> {
        if self.char {
            if self.unsigned { return Ok(PredefinedType::UChar); }
            if self.signed { return Ok(PredefinedType::SChar); }
            return Ok(PredefinedType::Char);
        }
        if self.short {
            if self.unsigned { return Ok(PredefinedType::UShort); }
            if self.signed { return Ok(PredefinedType::SShort); }
            return Ok(PredefinedType::Short);
        }
        if self.float {
            return Ok(PredefinedType::Float);
        }
        if self.double {
            if self.total_longs > 0 { return Ok(PredefinedType::LDouble); }
            return Ok(PredefinedType::Double);
        }

        if self.total_longs > 1 {
            if self.unsigned { return Ok(PredefinedType::ULongLong); }
            if self.signed { return Ok(PredefinedType::SLongLong); }
            return Ok(PredefinedType::LongLong);
        }
        if self.total_longs > 0 {
            if self.unsigned { return Ok(PredefinedType::ULong); }
            if self.signed { return Ok(PredefinedType::SLong); }
            return Ok(PredefinedType::Long);
        }

        if self.int {
            if self.unsigned { return Ok(PredefinedType::UInt); }
            if self.signed { return Ok(PredefinedType::SInt); }
            return Ok(PredefinedType::Int);
        }

        Err(Error::Failure {
            message: "is not a basic type".to_owned(),
        })
    }

    // Applies the collected modifiers to a named type that resolved
    // to a predefined basic type, yielding the merged predefined
    // typedef (e.g. `unsigned` + a typedef of `long` is `ulong`).
    fn merge_predefined(&mut self, existing: PredefinedType) -> Result<PredefinedType> {
        let mut merged = existing;

        match existing {
            PredefinedType::Void
            | PredefinedType::Bool
            | PredefinedType::Pointer
            | PredefinedType::Binary
            | PredefinedType::Size
            | PredefinedType::String
            | PredefinedType::AString
            | PredefinedType::WString => {
                if self.any_basic {
                    return Err(invalid_modifier());
                }
            },

            PredefinedType::UChar => {
                if self.signed || self.char || self.short || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
            },
            PredefinedType::Char => {
                if self.char || self.short || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                if self.signed { merged = PredefinedType::SChar; }
                if self.unsigned { merged = PredefinedType::UChar; }
            },
            PredefinedType::SChar => {
                if self.unsigned || self.char || self.short || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
            },

            PredefinedType::UShort => {
                if self.signed || self.char || self.short || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.int = false;
            },
            PredefinedType::Short => {
                if self.char || self.short || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.int = false;
                if self.signed { merged = PredefinedType::SShort; }
                if self.unsigned { merged = PredefinedType::UShort; }
            },
            PredefinedType::SShort => {
                if self.unsigned || self.char || self.short || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.int = false;
            },

            PredefinedType::UInt => {
                if self.signed || self.char || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                if self.short { merged = PredefinedType::UShort; }
            },
            PredefinedType::Int => {
                if self.char || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                if self.short {
                    merged = if self.signed {
                        PredefinedType::SShort
                    } else if self.unsigned {
                        PredefinedType::UShort
                    } else {
                        PredefinedType::Short
                    };
                } else {
                    if self.signed { merged = PredefinedType::SInt; }
                    if self.unsigned { merged = PredefinedType::UInt; }
                }
            },
            PredefinedType::SInt => {
                if self.unsigned || self.char || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                if self.short { merged = PredefinedType::SShort; }
            },

            PredefinedType::ULong => {
                if self.signed || self.char || self.short || self.total_longs > 1 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.int = false;
                if self.total_longs > 0 { merged = PredefinedType::ULongLong; }
            },
            PredefinedType::Long => {
                if self.char || self.short || self.total_longs > 1 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.int = false;
                if self.total_longs > 0 {
                    merged = if self.signed {
                        PredefinedType::SLongLong
                    } else if self.unsigned {
                        PredefinedType::ULongLong
                    } else {
                        PredefinedType::LongLong
                    };
                } else {
                    if self.signed { merged = PredefinedType::SLong; }
                    if self.unsigned { merged = PredefinedType::ULong; }
                }
            },
            PredefinedType::SLong => {
                if self.unsigned || self.char || self.short || self.total_longs > 1 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.int = false;
                if self.total_longs > 0 { merged = PredefinedType::SLongLong; }
            },

            PredefinedType::ULongLong => {
                if self.signed || self.char || self.short || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.int = false;
            },
            PredefinedType::LongLong => {
                if self.char || self.short || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.int = false;
                if self.signed { merged = PredefinedType::SLongLong; }
                if self.unsigned { merged = PredefinedType::ULongLong; }
            },
            PredefinedType::SLongLong => {
                if self.unsigned || self.char || self.short || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                self.int = false;
            },

            PredefinedType::UInt8
            | PredefinedType::UInt16
            | PredefinedType::UInt32
            | PredefinedType::UInt64
            | PredefinedType::Byte
            | PredefinedType::Word
            | PredefinedType::Dword
            | PredefinedType::Qword => {
                if self.signed || self.char || self.short || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
            },
            PredefinedType::SInt8
            | PredefinedType::SInt16
            | PredefinedType::SInt32
            | PredefinedType::SInt64 => {
                if self.unsigned || self.char || self.short || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
            },
            PredefinedType::Int8 => {
                if self.char || self.short || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                if self.signed { merged = PredefinedType::SInt8; }
                if self.unsigned { merged = PredefinedType::UInt8; }
            },
            PredefinedType::Int16 => {
                if self.char || self.short || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                if self.signed { merged = PredefinedType::SInt16; }
                if self.unsigned { merged = PredefinedType::UInt16; }
            },
            PredefinedType::Int32 => {
                if self.char || self.short || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                if self.signed { merged = PredefinedType::SInt32; }
                if self.unsigned { merged = PredefinedType::UInt32; }
            },
            PredefinedType::Int64 => {
                if self.char || self.short || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
                if self.signed { merged = PredefinedType::SInt64; }
                if self.unsigned { merged = PredefinedType::UInt64; }
            },

            PredefinedType::Float
            | PredefinedType::Float32
            | PredefinedType::Float64 => {
                if self.signed || self.unsigned || self.char || self.short || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
            },
            PredefinedType::Double => {
                if self.signed || self.unsigned || self.char || self.short || self.int || self.float || self.double {
                    return Err(invalid_modifier());
                }
                if self.total_longs > 0 { merged = PredefinedType::LDouble; }
            },
            PredefinedType::LDouble => {
                if self.signed || self.unsigned || self.char || self.short || self.int || self.total_longs > 0 || self.float || self.double {
                    return Err(invalid_modifier());
                }
            },
        }

        Ok(merged)
    }

    // Resolution proper: turn the folded bag into a type node,
    // synthesizing a typedef when the modifiers force one.
    fn process(&mut self, context: &RcContext, created: &mut Option<RcContext>) -> Result<RcContext> {
        if self.short && self.int {
            self.int = false; // `short int` carries no extra information
        }

        if !self.type_name.is_empty() {
            let existing = match model::find_type(context, &self.type_name)? {
                Some(found) => found,
                None => return Err(Error::Failure {
                    message: format!("type was not found: {}", self.type_name),
                }),
            };

            let terminal = model::walk_typedef_chain(&existing)?;
            let basic = {
                let ptr = terminal.borrow()?;
                ptr.as_basic().map(|basic| basic.base)
            };

            if let Some(base) = basic {
                let merged = self.merge_predefined(base)?;
                let merged_type = match model::find_type(context, merged.name())? {
                    Some(found) => found,
                    None => return Err(Error::Failure {
                        message: format!("did not find predefined type: {}", merged.name()),
                    }),
                };

                let typedef = make_typedef(context, &merged_type, self.constant)?;

                // the synthesized typedef inherits the flags of the
                // typedef that was being re-modified, if there was one
                let inherited = {
                    let ptr = existing.borrow()?;
                    ptr.as_typedef().map(|td| (td.constant, td.info.modifiers.clone()))
                };
                if let Some((constant, modifiers)) = inherited {
                    let mut ptr = typedef.borrow_mut()?;
                    {
                        let td = ptr.as_typedef_mut().ok_or_else(lazy_bug!("synthesized typedef is not a typedef"))?;
                        td.constant = td.constant || constant;
                    }
                    ptr.info_mut().modifiers = modifiers;
                }

                *created = Some(typedef.clone());
                return Ok(typedef);
            }

            if self.any_basic {
                return Err(invalid_modifier());
            }
            if !self.any_other {
                return Ok(existing);
            }

            let typedef = make_typedef(context, &existing, self.constant)?;
            *created = Some(typedef.clone());
            return Ok(typedef);
        }

        if !self.any_basic {
            return Err(invalid_modifier());
        }

        let predefined = self.basic_type()?;
        let existing = match model::find_type(context, predefined.name())? {
            Some(found) => found,
            None => return Err(Error::Failure {
                message: format!("did not find basic type: {}", predefined.name()),
            }),
        };

        if self.any_other {
            let typedef = make_typedef(context, &existing, self.constant)?;
            *created = Some(typedef.clone());
            Ok(typedef)
        } else {
            Ok(existing)
        }
    }
}

fn make_typedef(context: &RcContext, original: &RcContext, constant: bool) -> Result<RcContext> {
    let typedef = Context::new_typedef(context);
    {
        let mut ptr = typedef.borrow_mut()?;
        let td = ptr.as_typedef_mut().ok_or_else(lazy_bug!("freshly made typedef is not a typedef"))?;
        td.constant = constant;
        td.original_type = original.to_weak();
    }
    Ok(typedef)
}

// Attaches the line of the last consumed token to a location-less
// domain error coming out of the modifier bag.
fn at_line(error: Error, line: usize, what: &str) -> Error {
    match error {
        Error::Failure { message } => Error::Syntax {
            message: format!("{} {}", what, message),
            line,
        },
        other => other,
    }
}

/// Resolves a token run denoting a type against `context`. When the
/// run forced the synthesis of a typedef (modifiers, `const`, or
/// template arguments), that typedef is handed back in `created` so
/// the caller may adopt and name it; the returned type itself has
/// pure no-op wrappers collapsed away.
pub fn find_type_or_create_typedef(
    stack: &mut TokenStack,
    context: &RcContext,
    tokens: &TokenList,
    created: &mut Option<RcContext>,
) -> Result<RcContext> {
    let what = "type search";

    let mut pretemplate = TokenList::new();
    let mut template_arguments = Vec::new();

    // split off the template argument list; the tokens before the
    // first top-level `<` denote the type being referred to
    stack.push(tokens.clone());
    while stack.has_more() {
        let token = stack.extract(what)?;

        if token.kind == TokenKind::AngleBrace && token.is_open_brace() {
            stack.put_back(token);

            let mut contents = TokenList::new();
            stack.extract_to_closing_brace(what, &mut contents, false)?;

            stack.push(contents);
            while stack.has_more() {
                if stack.peek(what)?.kind == TokenKind::CommaOperator {
                    stack.extract(what)?;
                    continue;
                }

                let mut argument = TokenList::new();
                stack.extract_to_comma(what, &mut argument)?;

                let mut argument_typedef = None;
                let ty = find_type_or_create_typedef(stack, context, &argument, &mut argument_typedef)?;
                template_arguments.push(ty);
            }
            stack.pop();
            break;
        }

        pretemplate.push_back(token);
    }
    stack.pop();

    // fold the pre-template tokens into the modifier bag
    stack.push(pretemplate);
    let mut bag = ModifierBag::default();
    while stack.has_more() {
        let token = stack.extract(what)?;
        let folded = match token.kind {
            TokenKind::Identifier => bag.insert(&token.lexeme),
            TokenKind::ScopeOperator => bag.insert_scope(),
            _ => Err(Error::Failure {
                message: format!("has no legal type modifier: \"{}\"", token.lexeme),
            }),
        };
        folded.map_err(|error| at_line(error, stack.last_line(), what))?;
    }
    stack.pop();

    let result = bag.process(context, created)
        .map_err(|error| at_line(error, stack.last_line(), what))?;

    if !template_arguments.is_empty() {
        let underlying = {
            let original = {
                let ptr = result.borrow()?;
                match ptr.as_typedef() {
                    Some(typedef) => Some(typedef.original_type.to_rc()?),
                    None => None,
                }
            };
            match original {
                Some(inner) => inner,
                None => result.clone(),
            }
        };

        let generic_count = {
            let ptr = underlying.borrow()?;
            ptr.as_struct().map_or(0, |strct| strct.generics.len())
        };
        if generic_count == 0 {
            syntax_error!(
                stack.last_line(),
                "{} has template arguments but the referenced type is not a generic struct",
                what
            );
        }

        let typedef = match created.clone() {
            Some(existing) => existing,
            None => {
                let fresh = make_typedef(context, &result, false)?;
                *created = Some(fresh.clone());
                fresh
            },
        };

        {
            let mut ptr = typedef.borrow_mut()?;
            let td = ptr.as_typedef_mut().ok_or_else(lazy_bug!("created typedef is not a typedef"))?;
            // TODO: substitute the arguments into the generic struct
            // and resolve to the concrete instantiation
            td.template_arguments = template_arguments;
        }

        return Ok(typedef);
    }

    model::bypass_noop_typedef(&result)
}
