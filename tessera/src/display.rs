//! The [`Display`] trait.
use crate::{Result, Value, Writer};

/// Render value as template text.
pub trait Display {
    fn display(&self, f: &mut impl Writer) -> Result<()>;
}

impl<R> Display for &R where R: Display + ?Sized {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        R::display(*self, f)
    }
}

impl<T> Display for Option<T> where T: Display {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        if let Some(me) = self {
            T::display(me, f)?;
        }
        Ok(())
    }
}

impl Display for str {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        f.write_str(self)
    }
}

impl Display for String {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        f.write_str(self)
    }
}

impl Display for bool {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        f.write_str(if *self { "true" } else { "false" })
    }
}

macro_rules! render_int {
    ($($t:ty),*) => {
        $(
            impl Display for $t {
                fn display(&self, f: &mut impl Writer) -> Result<()> {
                    f.write_str(itoa::Buffer::new().format(*self))
                }
            }
        )*
    };
}

render_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl Display for f64 {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        if self.is_finite() && self.fract() == 0.0 && self.abs() < 1e16 {
            f.write_str(itoa::Buffer::new().format(*self as i64))?;
            f.write_str(".0")
        } else {
            f.write_str(&self.to_string())
        }
    }
}

impl Display for Value {
    fn display(&self, f: &mut impl Writer) -> Result<()> {
        match self {
            Value::Nil | Value::Deferred(_) => Ok(()),
            Value::Bool(b) => b.display(f),
            Value::Int(n) => n.display(f),
            Value::Float(n) => n.display(f),
            Value::Str(s) => f.write_str(s),
            Value::List(list) => {
                for item in list.iter() {
                    item.display(f)?;
                }
                Ok(())
            }
            Value::Map(map) => {
                for (key, value) in map.iter() {
                    f.write_str(key)?;
                    value.display(f)?;
                }
                Ok(())
            }
            Value::Object(object) => object.render(f),
        }
    }
}
