use std::ops::*;
use num;
use super::super::numeric::Float;
use super::super::error::{Error, Result};

pub type Vector3f = Vector3<Float>;

/// Representation of a 3D Vector.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[repr(C)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T
}

impl<T> Vector3<T> {
    #[inline]
    pub fn new(x: T, y: T, z: T) -> Vector3<T> {
        Vector3::<T>{x, y, z}
    }

    #[inline]
    pub fn zero() -> Vector3<T>
    where
    T: num::Zero
    {
        Vector3::<T>{x: T::zero(), y: T::zero(), z: T::zero()}
    }

    #[inline]
    pub fn has_nans(&self) -> bool
    where
    T: num::Float
    {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }

    /// Calculate the squared length of the Vector3.
    #[inline]
    pub fn length_squared(&self) -> T
    where
    T: Copy + Add<T, Output = T> + Mul<T, Output = T>
    {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Calculate the dot product of two Vector3.
    #[inline]
    pub fn dot(&self, o: &Vector3<T>) -> T
    where
    T: Copy + Add<T, Output = T> + Mul<T, Output = T>
    {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    /// Calculate the cross product of two Vector3.
    pub fn cross(&self, o: &Vector3<T>) -> Vector3<T>
    where
    T: Copy + Sub<T, Output = T> + Mul<T, Output = T>
    {
        Vector3::<T>{
            x: self.y * o.z - self.z * o.y,
            y: self.z * o.x - self.x * o.z,
            z: self.x * o.y - self.y * o.x
        }
    }
}

impl Vector3<Float> {
    /// Calculate the length of the Vector3.
    #[inline]
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }

    /// Returns the Vector3 normalized to unit length.
    /// A zero vector normalizes to NaNs.
    pub fn normalize(&self) -> Vector3<Float> {
        let inv = 1.0 / self.length();
        *self * inv
    }

    pub fn to_array(&self) -> [Float; 3] {
        [self.x, self.y, self.z]
    }

    /// Build a Vector3 from a slice that must hold exactly three components.
    pub fn from_slice(v: &[Float]) -> Result<Vector3<Float>> {
        if v.len() != 3 {
            return Err(Error::shape(format!("expected a 3-component vector, got {} components", v.len())));
        }
        Ok(Vector3::new(v[0], v[1], v[2]))
    }
}

impl<T> Index<usize> for Vector3<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Index out of range for Vector3"),
        }
    }
}

impl<T> Neg for Vector3<T>
where
T: Neg<Output = T>
{
    type Output = Self;

    fn neg(self) -> Vector3<T> {
        Vector3::<T>{
            x: -self.x,
            y: -self.y,
            z: -self.z
        }
    }
}

impl<T> Mul<T> for Vector3<T>
where
T: Copy + Mul<T, Output = T>
{
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        Vector3::<T>{
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs
        }
    }
}

impl<T> Div<T> for Vector3<T>
where
T: Copy + Div<T, Output = T>
{
    type Output = Self;
    #[inline]
    fn div(self, rhs: T) -> Self {
        Vector3::<T>{
            x: self.x / rhs,
            y: self.y / rhs,
            z: self.z / rhs
        }
    }
}

impl<T> Add<Vector3<T>> for Vector3<T>
where
T: Add<T, Output = T>
{
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Vector3::<T>{
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z
        }
    }
}

impl<T> Sub<Vector3<T>> for Vector3<T>
where
T: Sub<T, Output = T>
{
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Vector3::<T>{
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_is_right_handed() {
        let x = Vector3f::new(1.0, 0.0, 0.0);
        let y = Vector3f::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(&x), Vector3f::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_normalize() {
        let v = Vector3f::new(3.0, 0.0, 4.0).normalize();
        assert!((v.length() - 1.0).abs() < 1e-15);
        assert!((v.x - 0.6).abs() < 1e-15 && v.y == 0.0 && (v.z - 0.8).abs() < 1e-15);
        assert!(Vector3f::zero().normalize().has_nans());
    }

    #[test]
    fn test_from_slice() {
        assert_eq!(Vector3f::from_slice(&[1.0, 2.0, 3.0]).unwrap(), Vector3f::new(1.0, 2.0, 3.0));
        assert!(Vector3f::from_slice(&[1.0, 2.0]).is_err());
        assert!(Vector3f::from_slice(&[1.0, 2.0, 3.0, 4.0]).is_err());
    }
}
