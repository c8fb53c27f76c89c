use std::fmt::Display;

/// The primitives every program can name without binding them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Isinteger,
    Isstring,
    Istuple,
    Isdummy,
    Istruthvalue,
    Isfunction,
    ItoS,
    Order,
    Conc,
    Stern,
    Stem,
    Null,
    Print,
    Neg,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Isinteger" => Option::Some(Builtin::Isinteger),
            "Isstring" => Option::Some(Builtin::Isstring),
            "Istuple" => Option::Some(Builtin::Istuple),
            "Isdummy" => Option::Some(Builtin::Isdummy),
            "Istruthvalue" => Option::Some(Builtin::Istruthvalue),
            "Isfunction" => Option::Some(Builtin::Isfunction),
            "ItoS" => Option::Some(Builtin::ItoS),
            "Order" => Option::Some(Builtin::Order),
            "Conc" | "conc" => Option::Some(Builtin::Conc),
            "Stern" => Option::Some(Builtin::Stern),
            "Stem" => Option::Some(Builtin::Stem),
            "Null" => Option::Some(Builtin::Null),
            "Print" | "print" => Option::Some(Builtin::Print),
            "neg" => Option::Some(Builtin::Neg),
            _ => Option::None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Isinteger => "Isinteger",
            Builtin::Isstring => "Isstring",
            Builtin::Istuple => "Istuple",
            Builtin::Isdummy => "Isdummy",
            Builtin::Istruthvalue => "Istruthvalue",
            Builtin::Isfunction => "Isfunction",
            Builtin::ItoS => "ItoS",
            Builtin::Order => "Order",
            Builtin::Conc => "Conc",
            Builtin::Stern => "Stern",
            Builtin::Stem => "Stem",
            Builtin::Null => "Null",
            Builtin::Print => "Print",
            Builtin::Neg => "neg",
        }
    }
}

impl Display for Builtin {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str(self.name())
    }
}

#[test]
fn test_builtin_aliases() {
    assert_eq!(Builtin::from_name("conc"), Option::Some(Builtin::Conc));
    assert_eq!(Builtin::from_name("print"), Option::Some(Builtin::Print));
    assert_eq!(Builtin::from_name("Neg"), Option::None);
    assert_eq!(Builtin::from_name("stem"), Option::None);
}
